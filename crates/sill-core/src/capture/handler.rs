use base64::Engine;
use tracing::{debug, info, warn};

use super::errors::CaptureError;
use super::types::{
    CaptureSourceRecord, SCREEN_ID_PREFIX, SourceKind, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH,
    WINDOW_ID_PREFIX,
};

/// Enumerate all capturable screens and windows with thumbnails.
///
/// Screens come first, then windows, each in the order the OS returned
/// them. Sources whose properties or capture fail are skipped rather than
/// failing the whole enumeration; only a failure of the underlying
/// enumeration calls themselves is an error.
pub fn enumerate_capture_sources() -> Result<Vec<CaptureSourceRecord>, CaptureError> {
    info!(event = "core.capture.enumeration_started");

    let mut sources = Vec::new();
    let mut skipped_count = 0;

    let monitors = xcap::Monitor::all().map_err(|e| CaptureError::ScreenEnumerationFailed {
        message: e.to_string(),
    })?;

    for (idx, monitor) in monitors.into_iter().enumerate() {
        match screen_record(&monitor, idx) {
            Some(record) => sources.push(record),
            None => skipped_count += 1,
        }
    }

    let windows = xcap::Window::all().map_err(|e| CaptureError::WindowEnumerationFailed {
        message: e.to_string(),
    })?;

    let mut tiny_count = 0;
    for window in windows {
        match window_record(&window, &mut tiny_count) {
            Some(record) => sources.push(record),
            None => skipped_count += 1,
        }
    }

    if skipped_count > 0 {
        warn!(
            event = "core.capture.enumeration_incomplete",
            skipped_count = skipped_count,
            tiny_count = tiny_count,
            returned_count = sources.len()
        );
    }

    info!(
        event = "core.capture.enumeration_completed",
        count = sources.len()
    );
    Ok(sources)
}

/// Build the record for one screen, or `None` when it must be skipped.
fn screen_record(monitor: &xcap::Monitor, idx: usize) -> Option<CaptureSourceRecord> {
    let id = format!("{}{}", SCREEN_ID_PREFIX, idx);

    let name = monitor
        .name()
        .unwrap_or_else(|_| format!("Display {}", idx));

    let image = match monitor.capture_image() {
        Ok(image) => image,
        Err(e) => {
            debug!(
                event = "core.capture.screen_capture_failed",
                source_id = id,
                error = %e
            );
            return None;
        }
    };

    let thumbnail_url = match encode_thumbnail(&image) {
        Ok(url) => url,
        Err(e) => {
            debug!(
                event = "core.capture.thumbnail_failed",
                source_id = id,
                error = %e
            );
            return None;
        }
    };

    Some(CaptureSourceRecord {
        kind: SourceKind::from_id(&id),
        id,
        name,
        thumbnail_url,
    })
}

/// Build the record for one window, or `None` when it must be skipped.
fn window_record(window: &xcap::Window, tiny_count: &mut usize) -> Option<CaptureSourceRecord> {
    let id = match window.id() {
        Ok(id) => format!("{}{}", WINDOW_ID_PREFIX, id),
        Err(e) => {
            debug!(
                event = "core.capture.property_access_failed",
                property = "id",
                error = %e
            );
            return None;
        }
    };

    let width = window.width().unwrap_or(0);
    let height = window.height().unwrap_or(0);

    // Skip tiny windows (likely invisible/system windows)
    if width < 10 || height < 10 {
        *tiny_count += 1;
        return None;
    }

    let title = window.title().ok().unwrap_or_default();
    let app_name = window.app_name().ok().unwrap_or_default();
    let name = display_name(&title, &app_name, &id);

    let image = match window.capture_image() {
        Ok(image) => image,
        Err(e) => {
            debug!(
                event = "core.capture.window_capture_failed",
                source_id = id,
                error = %e
            );
            return None;
        }
    };

    let thumbnail_url = match encode_thumbnail(&image) {
        Ok(url) => url,
        Err(e) => {
            debug!(
                event = "core.capture.thumbnail_failed",
                source_id = id,
                error = %e
            );
            return None;
        }
    };

    Some(CaptureSourceRecord {
        kind: SourceKind::from_id(&id),
        id,
        name,
        thumbnail_url,
    })
}

/// Build a display name from window title and app name.
fn display_name(title: &str, app_name: &str, id: &str) -> String {
    if !title.is_empty() {
        return title.to_string();
    }

    if !app_name.is_empty() {
        return app_name.to_string();
    }

    format!("[{}]", id)
}

/// Scale dimensions to fit within the thumbnail bounds, preserving aspect
/// ratio. Sources already within bounds keep their size.
fn thumbnail_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= THUMBNAIL_WIDTH && height <= THUMBNAIL_HEIGHT {
        return (width.max(1), height.max(1));
    }

    let scale = f64::min(
        THUMBNAIL_WIDTH as f64 / width as f64,
        THUMBNAIL_HEIGHT as f64 / height as f64,
    );
    let scaled_width = ((width as f64 * scale) as u32).max(1);
    let scaled_height = ((height as f64 * scale) as u32).max(1);
    (scaled_width, scaled_height)
}

/// Downscale a captured image and encode it as a PNG data URI.
fn encode_thumbnail(image: &image::RgbaImage) -> Result<String, CaptureError> {
    let (width, height) = thumbnail_dimensions(image.width(), image.height());
    let scaled = image::imageops::thumbnail(image, width, height);

    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgba8(scaled)
        .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
        .map_err(|e| CaptureError::ThumbnailEncodingFailed {
            message: e.to_string(),
        })?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&buffer);
    Ok(format!("data:image/png;base64,{}", encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_dimensions_small_source_unchanged() {
        assert_eq!(thumbnail_dimensions(320, 200), (320, 200));
    }

    #[test]
    fn test_thumbnail_dimensions_downscale_preserves_aspect() {
        // 1920x1080 scaled to fit 400x300 is bounded by width
        let (w, h) = thumbnail_dimensions(1920, 1080);
        assert_eq!(w, 400);
        assert_eq!(h, 225);

        // 1080x1920 (portrait) is bounded by height
        let (w, h) = thumbnail_dimensions(1080, 1920);
        assert_eq!(h, 300);
        assert!(w <= 400);
    }

    #[test]
    fn test_thumbnail_dimensions_never_zero() {
        assert_eq!(thumbnail_dimensions(0, 0), (1, 1));
        let (w, h) = thumbnail_dimensions(10000, 1);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(display_name("Editor", "App", "window:1"), "Editor");
        assert_eq!(display_name("", "App", "window:1"), "App");
        assert_eq!(display_name("", "", "window:1"), "[window:1]");
    }

    #[test]
    fn test_encode_thumbnail_produces_png_data_uri() {
        let image = image::RgbaImage::from_pixel(64, 48, image::Rgba([10, 20, 30, 255]));
        let url = encode_thumbnail(&image).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        // The payload must round-trip back to PNG bytes
        let payload = url.trim_start_matches("data:image/png;base64,");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_enumerate_capture_sources_does_not_panic() {
        // Actual enumeration depends on the environment; headless machines
        // are expected to fail with an error rather than panic.
        let result = enumerate_capture_sources();
        if let Ok(sources) = result {
            for source in sources {
                assert!(!source.id.is_empty());
                assert_eq!(source.kind, SourceKind::from_id(&source.id));
            }
        }
    }
}
