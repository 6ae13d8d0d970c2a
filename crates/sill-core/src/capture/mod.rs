//! Capture-source enumeration.
//!
//! Queries the OS compositor for all capturable screens and windows and
//! produces point-in-time [`CaptureSourceRecord`]s with downscaled PNG
//! thumbnails encoded as data URIs. Nothing here is cached; every call
//! re-queries the OS in full.

pub mod access;
pub mod errors;
pub mod handler;
pub mod types;

pub use access::{open_screen_privacy_settings, screen_access_granted};
pub use errors::CaptureError;
pub use handler::enumerate_capture_sources;
pub use types::{CaptureSourceRecord, SourceKind, SCREEN_ID_PREFIX};
