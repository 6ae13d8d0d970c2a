//! Window backend implementations.
//!
//! The backend decides what a window physically is. The process backend
//! spawns one presentation process per surface; the headless backend only
//! tracks handles, which is what the host runs when no presentation
//! command is configured.

pub mod headless;
pub mod process;

use std::sync::Arc;

use crate::loader::LoaderTarget;
use crate::windows::errors::WindowError;
use crate::windows::types::{WindowConfig, WindowId};

pub use headless::HeadlessWindowBackend;
pub use process::ProcessWindowBackend;

/// The seam between the controller and the native surface.
///
/// Implementations must be cheap to call from lifecycle handlers; nothing
/// here may block the host loop for long.
pub trait WindowBackend: Send + Sync {
    /// Create the native surface and load the target into it.
    fn open(
        &self,
        id: WindowId,
        config: &WindowConfig,
        target: &LoaderTarget,
    ) -> Result<(), WindowError>;

    /// Bring the surface to foreground focus.
    fn focus(&self, id: WindowId) -> Result<(), WindowError>;

    /// Restore the surface from its minimized state.
    fn restore(&self, id: WindowId) -> Result<(), WindowError>;

    fn is_minimized(&self, id: WindowId) -> bool;

    /// Tear the surface down.
    fn close(&self, id: WindowId) -> Result<(), WindowError>;

    /// Window ids whose native surface has gone away since the last call.
    fn drain_closed(&self) -> Vec<WindowId> {
        Vec::new()
    }
}

/// Pick the backend for the configured presentation command.
pub fn backend_for(presentation_command: Option<&str>) -> Arc<dyn WindowBackend> {
    match presentation_command {
        Some(command) => Arc::new(ProcessWindowBackend::new(command)),
        None => Arc::new(HeadlessWindowBackend::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_for_selects_by_command_presence() {
        let headless = backend_for(None);
        assert!(headless.drain_closed().is_empty());

        let process = backend_for(Some("sill-renderer"));
        assert!(process.drain_closed().is_empty());
    }
}
