//! Channel names that cross the process boundary.
//!
//! The set is closed: the host only registers capabilities and signal
//! routes for these names, and the gateway only exposes named wrappers
//! for them.

/// Open the OS screen-recording privacy settings (sandbox -> host call).
pub const OPEN_SCREEN_SECURITY: &str = "electronMain:openScreenSecurity";

/// Query whether screen-recording access is granted (sandbox -> host call).
pub const GET_SCREEN_ACCESS: &str = "electronMain:getScreenAccess";

/// Enumerate capturable screens and windows (sandbox -> host call).
pub const GET_SCREEN_SOURCES: &str = "electronMain:screen:getSources";

/// Request a child window for a navigation hint (sandbox -> host signal).
pub const OPEN_WIN: &str = "open-win";

/// A losing process announces itself to the running host (signal).
pub const SECOND_INSTANCE: &str = "second-instance";

/// One-time ready message with a timestamp (host -> sandbox push).
pub const MAIN_PROCESS_MESSAGE: &str = "main-process-message";
