//! Screen-recording permission queries and the OS privacy pane.
//!
//! Only macOS gates screen capture behind a user-granted permission.
//! Platforms without a gating concept report access as granted.

/// Whether the OS currently grants screen-recording access to this process.
///
/// Never fails: platforms without a gating concept report `true`
/// unconditionally.
pub fn screen_access_granted() -> bool {
    #[cfg(target_os = "macos")]
    {
        let granted = core_graphics::access::ScreenCaptureAccess::default().preflight();
        tracing::info!(event = "core.capture.access_checked", granted = granted);
        granted
    }

    #[cfg(not(target_os = "macos"))]
    {
        tracing::debug!(event = "core.capture.access_checked", granted = true);
        true
    }
}

/// Open the OS screen-recording privacy settings, best effort.
///
/// Failures are swallowed; on platforms without such a pane this is a
/// silent no-op.
pub fn open_screen_privacy_settings() {
    #[cfg(target_os = "macos")]
    {
        const PRIVACY_PANE_URL: &str =
            "x-apple.systempreferences:com.apple.preference.security?Privacy_ScreenCapture";

        match std::process::Command::new("open")
            .arg(PRIVACY_PANE_URL)
            .spawn()
        {
            Ok(_) => tracing::info!(event = "core.capture.privacy_settings_opened"),
            Err(e) => tracing::warn!(
                event = "core.capture.privacy_settings_open_failed",
                error = %e
            ),
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        tracing::debug!(event = "core.capture.privacy_settings_unsupported");
    }
}
