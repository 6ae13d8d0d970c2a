//! Window handles and the backend seam.
//!
//! The controller owns opaque [`types::WindowHandle`]s; what a window
//! physically is - a spawned presentation process or nothing at all -
//! is decided by the [`backends::WindowBackend`] implementation.

pub mod backends;
pub mod errors;
pub mod types;

pub use backends::{WindowBackend, backend_for};
pub use errors::WindowError;
pub use types::{WindowConfig, WindowHandle, WindowId, WindowKind};
