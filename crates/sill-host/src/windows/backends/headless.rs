use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::WindowBackend;
use crate::loader::LoaderTarget;
use crate::windows::errors::WindowError;
use crate::windows::types::{WindowConfig, WindowId};

/// Backend with no native surfaces.
///
/// Used when no presentation command is configured: handles are tracked
/// and every operation succeeds, so the host and its bridge stay fully
/// exercisable without a renderer.
pub struct HeadlessWindowBackend {
    open_windows: Mutex<HashSet<WindowId>>,
}

impl HeadlessWindowBackend {
    pub fn new() -> Self {
        Self {
            open_windows: Mutex::new(HashSet::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<WindowId>> {
        self.open_windows.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for HeadlessWindowBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowBackend for HeadlessWindowBackend {
    fn open(
        &self,
        id: WindowId,
        config: &WindowConfig,
        target: &LoaderTarget,
    ) -> Result<(), WindowError> {
        self.lock().insert(id);
        info!(
            event = "host.window.headless_opened",
            window_id = id,
            title = config.title,
            target = %target.describe(),
        );
        Ok(())
    }

    fn focus(&self, id: WindowId) -> Result<(), WindowError> {
        debug!(event = "host.window.headless_focus", window_id = id);
        Ok(())
    }

    fn restore(&self, id: WindowId) -> Result<(), WindowError> {
        debug!(event = "host.window.headless_restore", window_id = id);
        Ok(())
    }

    fn is_minimized(&self, _id: WindowId) -> bool {
        false
    }

    fn close(&self, id: WindowId) -> Result<(), WindowError> {
        self.lock().remove(&id);
        debug!(event = "host.window.headless_closed", window_id = id);
        Ok(())
    }
}
