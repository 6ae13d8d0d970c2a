//! # Configuration System
//!
//! Two layers of configuration for the sill host process:
//!
//! 1. **Runtime config** ([`HostConfig`]) - derived from environment
//!    variables and system defaults at startup. Carries the application
//!    root, the dev-server toggle, and the derived asset paths.
//! 2. **Shell config** ([`ShellConfig`]) - loaded from
//!    `~/.sill/config.toml`, holds window defaults and the presentation
//!    command. A missing file is not an error.
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.sill/config.toml
//! [window]
//! title = "Main window"
//! width = 800
//! height = 600
//!
//! [presentation]
//! command = "sill-renderer"
//! ```

pub mod defaults;
pub mod loading;
pub mod types;

// Public API exports
pub use types::{HostConfig, PresentationSection, ShellConfig, WindowSection};

impl ShellConfig {
    /// Load the shell configuration from the given sill directory.
    ///
    /// See [`loading::load_shell_config`] for details.
    pub fn load(sill_dir: &std::path::Path) -> Result<Self, crate::errors::ConfigError> {
        loading::load_shell_config(sill_dir)
    }
}
