use crate::errors::SillError;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate screens: {message}")]
    ScreenEnumerationFailed { message: String },

    #[error("Failed to enumerate windows: {message}")]
    WindowEnumerationFailed { message: String },

    #[error("Failed to encode thumbnail: {message}")]
    ThumbnailEncodingFailed { message: String },
}

impl SillError for CaptureError {
    fn error_code(&self) -> &'static str {
        match self {
            CaptureError::ScreenEnumerationFailed { .. } => "SCREEN_ENUMERATION_FAILED",
            CaptureError::WindowEnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            CaptureError::ThumbnailEncodingFailed { .. } => "THUMBNAIL_ENCODING_FAILED",
        }
    }
}
