//! sill-core: Core library for the sill desktop shell.
//!
//! This library provides the pieces shared by the privileged host process
//! and the bridge crate: configuration, logging bootstrap, the base error
//! trait, and capture-source enumeration.
//!
//! # Main Entry Points
//!
//! - [`capture`] - Enumerate capturable screens and windows with thumbnails
//! - [`config`] - Host configuration (environment + TOML)
//! - [`errors`] - Base error trait and config errors
//! - [`logging`] - Tracing subscriber initialization

pub mod capture;
pub mod config;
pub mod errors;
pub mod logging;

// Re-export commonly used types at crate root for convenience
pub use capture::types::{CaptureSourceRecord, SourceKind};
pub use config::{HostConfig, ShellConfig};

// Re-export logging initialization
pub use logging::init_logging;
