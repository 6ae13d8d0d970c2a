//! Configuration loading logic.
//!
//! Loads the shell configuration from `<sill_dir>/config.toml`. A missing
//! file yields the built-in defaults; a malformed file is an error.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::types::ShellConfig;
use crate::errors::ConfigError;

/// Load the shell configuration from `<sill_dir>/config.toml`.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
/// A missing config file is not an error.
pub fn load_shell_config(sill_dir: &Path) -> Result<ShellConfig, ConfigError> {
    let config_path = sill_dir.join("config.toml");

    if !config_path.exists() {
        debug!(
            event = "core.config.not_found",
            path = %config_path.display(),
        );
        return Ok(ShellConfig::default());
    }

    let content = fs::read_to_string(&config_path)?;
    let config: ShellConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: format!("'{}': {}", config_path.display(), e),
        })?;

    debug!(
        event = "core.config.loaded",
        path = %config_path.display(),
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_config_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_shell_config(dir.path()).unwrap();
        assert_eq!(config.window.title, "Main window");
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("config.toml")).unwrap();
        writeln!(
            file,
            "[window]\ntitle = \"Shell\"\nwidth = 1024\n\n[presentation]\ncommand = \"renderer\""
        )
        .unwrap();

        let config = load_shell_config(dir.path()).unwrap();
        assert_eq!(config.window.title, "Shell");
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.presentation.command, Some("renderer".to_string()));
    }

    #[test]
    fn test_load_malformed_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("config.toml")).unwrap();
        writeln!(file, "not valid toml [").unwrap();

        let result = load_shell_config(dir.path());
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ConfigParseError { .. }
        ));
    }
}
