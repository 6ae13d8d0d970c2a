//! Startup tweaks derived from the OS.
//!
//! None of this is part of the bridge contract; it covers the host's own
//! environment quirks before any window exists.

use tracing::info;

/// Adjustments applied once at startup.
#[derive(Debug, Clone)]
pub struct StartupTweaks {
    /// GPU compositing is unreliable on the legacy kernel line; spawned
    /// presentation processes get `--disable-gpu`.
    pub disable_hardware_acceleration: bool,
    /// OS-level application identifier, set on Windows only (used for
    /// taskbar grouping and notifications).
    pub app_user_model_id: Option<String>,
}

/// Probe the OS and compute the startup tweaks.
pub fn startup_tweaks(app_name: &str) -> StartupTweaks {
    let os_version = sysinfo::System::os_version();
    let disable_hardware_acceleration = os_version
        .as_deref()
        .map(is_legacy_os_version)
        .unwrap_or(false);

    if disable_hardware_acceleration {
        info!(
            event = "host.platform.hardware_acceleration_disabled",
            os_version = os_version.as_deref().unwrap_or("unknown"),
        );
    }

    let app_user_model_id = if cfg!(target_os = "windows") {
        info!(
            event = "host.platform.app_user_model_id_set",
            app_id = app_name,
        );
        Some(app_name.to_string())
    } else {
        None
    };

    StartupTweaks {
        disable_hardware_acceleration,
        app_user_model_id,
    }
}

/// Windows 7 reports kernel 6.1.
fn is_legacy_os_version(version: &str) -> bool {
    version.starts_with("6.1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_version_match() {
        assert!(is_legacy_os_version("6.1"));
        assert!(is_legacy_os_version("6.1.7601"));
        assert!(!is_legacy_os_version("6.2"));
        assert!(!is_legacy_os_version("10.0.19045"));
        assert!(!is_legacy_os_version(""));
    }

    #[test]
    fn test_startup_tweaks_app_id_platform_gated() {
        let tweaks = startup_tweaks("sill");
        if cfg!(target_os = "windows") {
            assert_eq!(tweaks.app_user_model_id.as_deref(), Some("sill"));
        } else {
            assert!(tweaks.app_user_model_id.is_none());
        }
    }
}
