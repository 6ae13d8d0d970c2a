use std::path::PathBuf;

use sill_core::errors::SillError;

use super::types::WindowId;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Window icon not found at '{}'", path.display())]
    IconMissing { path: PathBuf },

    #[error("Failed to spawn presentation process: {message}")]
    SpawnFailed { message: String },

    #[error("No window with id {id}")]
    WindowNotFound { id: WindowId },
}

impl SillError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::IconMissing { .. } => "WINDOW_ICON_MISSING",
            WindowError::SpawnFailed { .. } => "PRESENTATION_SPAWN_FAILED",
            WindowError::WindowNotFound { .. } => "WINDOW_NOT_FOUND",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WindowError::IconMissing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_missing_is_user_error() {
        let error = WindowError::IconMissing {
            path: PathBuf::from("/app/public/favicon.ico"),
        };
        assert_eq!(error.error_code(), "WINDOW_ICON_MISSING");
        assert!(error.is_user_error());
        assert!(error.to_string().contains("favicon.ico"));
    }

    #[test]
    fn test_spawn_failed_error_code() {
        let error = WindowError::SpawnFailed {
            message: "no such file".to_string(),
        };
        assert_eq!(error.error_code(), "PRESENTATION_SPAWN_FAILED");
        assert!(!error.is_user_error());
    }
}
