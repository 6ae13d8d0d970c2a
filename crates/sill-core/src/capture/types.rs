use serde::{Deserialize, Serialize};

/// Identifier prefix that marks a source as a whole screen.
pub const SCREEN_ID_PREFIX: &str = "screen:";

/// Identifier prefix for window sources.
pub const WINDOW_ID_PREFIX: &str = "window:";

/// Fixed thumbnail raster bounds. Thumbnails are scaled to fit within
/// this box, preserving aspect ratio.
pub const THUMBNAIL_WIDTH: u32 = 400;
pub const THUMBNAIL_HEIGHT: u32 = 300;

/// Classification of a capture source, derived purely from the id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Screen,
    Window,
}

impl SourceKind {
    /// Classify an id by inspecting its `screen:` prefix.
    pub fn from_id(id: &str) -> Self {
        if id.starts_with(SCREEN_ID_PREFIX) {
            SourceKind::Screen
        } else {
            SourceKind::Window
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Screen => "screen",
            SourceKind::Window => "window",
        }
    }
}

/// One capturable screen or window, snapshotted at enumeration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSourceRecord {
    /// Unique source id of the form `screen:<n>` or `window:<n>`.
    pub id: String,
    /// Display name of the screen or window.
    pub name: String,
    /// Classification, always consistent with the id prefix.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Thumbnail encoded as a `data:image/png;base64,` URI.
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_id_prefix() {
        assert_eq!(SourceKind::from_id("screen:0"), SourceKind::Screen);
        assert_eq!(SourceKind::from_id("screen:12"), SourceKind::Screen);
        assert_eq!(SourceKind::from_id("window:42"), SourceKind::Window);
        // Anything without the screen prefix is a window
        assert_eq!(SourceKind::from_id("display:0"), SourceKind::Window);
        assert_eq!(SourceKind::from_id(""), SourceKind::Window);
    }

    #[test]
    fn test_source_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SourceKind::Screen).unwrap(),
            r#""screen""#
        );
        assert_eq!(
            serde_json::to_string(&SourceKind::Window).unwrap(),
            r#""window""#
        );
    }

    #[test]
    fn test_record_wire_field_names() {
        let record = CaptureSourceRecord {
            id: "screen:0".to_string(),
            name: "Built-in Display".to_string(),
            kind: SourceKind::Screen,
            thumbnail_url: "data:image/png;base64,AAAA".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""type":"screen""#));
        assert!(json.contains(r#""thumbnailURL":"data:image/png;base64,AAAA""#));

        let parsed: CaptureSourceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
