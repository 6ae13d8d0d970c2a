//! Default implementations for configuration types.
//!
//! This module contains all `Default` implementations and helper functions
//! for providing default values in serde deserialization.

use crate::config::types::{HostConfig, WindowSection};
use std::path::PathBuf;

/// Returns the default main window title.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_window_title() -> String {
    "Main window".to_string()
}

/// Returns the default main window width in pixels.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_window_width() -> u32 {
    800
}

/// Returns the default main window height in pixels.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_window_height() -> u32 {
    600
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: default_window_title(),
            width: default_window_width(),
            height: default_window_height(),
            icon: None,
            preload: None,
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        let sill_dir = match dirs::home_dir() {
            Some(home) => home.join(".sill"),
            None => {
                eprintln!(
                    "Warning: Could not find home directory. Set HOME environment variable. \
                    Using fallback directory."
                );
                std::env::temp_dir().join(".sill")
            }
        };

        let app_root = std::env::var_os("SILL_ROOT")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        // An empty value means "unset" so wrapper scripts can pass the
        // variable through unconditionally.
        let dev_server_url = std::env::var("SILL_DEV_SERVER_URL")
            .ok()
            .filter(|url| !url.is_empty());

        let public_dir = if dev_server_url.is_some() {
            app_root.join("public")
        } else {
            app_root.join("dist")
        };

        Self {
            sill_dir,
            app_root,
            dev_server_url,
            public_dir,
            log_level: std::env::var("SILL_LOG_LEVEL").unwrap_or("info".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_section() {
        let window = WindowSection::default();
        assert_eq!(window.title, "Main window");
        assert_eq!(window.width, 800);
        assert_eq!(window.height, 600);
    }

    #[test]
    fn test_host_config_default_dir() {
        let config = HostConfig::new();
        assert!(config.sill_dir.to_string_lossy().contains(".sill"));
    }
}
