//! Configuration type definitions for the sill host.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for the host process.
///
/// This struct holds paths and settings derived from environment variables
/// and system defaults, not from config files.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Base directory for all sill runtime data (default: ~/.sill)
    pub sill_dir: PathBuf,
    /// Application root directory (`SILL_ROOT`, default: current directory)
    pub app_root: PathBuf,
    /// Live development endpoint (`SILL_DEV_SERVER_URL`). Presence toggles
    /// dev mode; absence means packaged mode.
    pub dev_server_url: Option<String>,
    /// Static assets directory, derived from the mode: `public/` under the
    /// app root in dev mode, `dist/` in packaged mode.
    pub public_dir: PathBuf,
    /// Log level for the application
    pub log_level: String,
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the host is serving a live development endpoint.
    pub fn is_dev(&self) -> bool {
        self.dev_server_url.is_some()
    }

    /// Path of the bridge socket, which doubles as the instance lock.
    pub fn socket_path(&self) -> PathBuf {
        self.sill_dir.join("host.sock")
    }

    /// Path of the packaged document loaded in packaged mode.
    pub fn packaged_document(&self) -> PathBuf {
        self.app_root.join("dist").join("index.html")
    }
}

/// Main configuration loaded from `~/.sill/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShellConfig {
    /// Main window defaults
    #[serde(default)]
    pub window: WindowSection,

    /// Presentation process settings
    #[serde(default)]
    pub presentation: PresentationSection,
}

/// Window defaults for the main window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSection {
    /// Window title.
    #[serde(default = "super::defaults::default_window_title")]
    pub title: String,

    /// Window width in pixels.
    #[serde(default = "super::defaults::default_window_width")]
    pub width: u32,

    /// Window height in pixels.
    #[serde(default = "super::defaults::default_window_height")]
    pub height: u32,

    /// Window icon path, relative to the static assets directory when not
    /// absolute.
    #[serde(default)]
    pub icon: Option<PathBuf>,

    /// Preload script handed to the presentation process before any
    /// application script runs.
    #[serde(default)]
    pub preload: Option<PathBuf>,
}

/// Presentation process settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PresentationSection {
    /// Command spawned for each presentation surface. When unset the host
    /// runs headless (window handles are tracked but no process spawns).
    #[serde(default)]
    pub command: Option<String>,
}
