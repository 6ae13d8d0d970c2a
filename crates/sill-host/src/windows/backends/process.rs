use std::collections::HashMap;
use std::process::Child;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::WindowBackend;
use crate::loader::LoaderTarget;
use crate::windows::errors::WindowError;
use crate::windows::types::{WindowConfig, WindowId};

/// Backend that spawns one presentation process per surface.
///
/// The presentation command receives the window geometry, the preload
/// script, and the loader target as arguments; everything else it needs
/// comes back over the bridge socket. Focus and restore are left to the
/// window manager on this backend.
pub struct ProcessWindowBackend {
    command: String,
    children: Mutex<HashMap<WindowId, Child>>,
}

impl ProcessWindowBackend {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            children: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<WindowId, Child>> {
        self.children.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WindowBackend for ProcessWindowBackend {
    fn open(
        &self,
        id: WindowId,
        config: &WindowConfig,
        target: &LoaderTarget,
    ) -> Result<(), WindowError> {
        let mut command = std::process::Command::new(&self.command);
        command
            .arg("--window-id")
            .arg(id.to_string())
            .arg("--title")
            .arg(&config.title)
            .arg("--width")
            .arg(config.width.to_string())
            .arg("--height")
            .arg(config.height.to_string());

        if let Some(icon) = &config.icon_path {
            command.arg("--icon").arg(icon);
        }
        if let Some(preload) = &config.preload_path {
            command.arg("--preload").arg(preload);
        }
        if config.disable_hardware_acceleration {
            command.arg("--disable-gpu");
        }

        match target {
            LoaderTarget::DevServer { url, hint } => {
                command.arg("--url").arg(url);
                if let Some(hint) = hint {
                    command.arg("--hint").arg(hint);
                }
            }
            LoaderTarget::Packaged { document, hint } => {
                command.arg("--document").arg(document);
                if let Some(hint) = hint {
                    command.arg("--hint").arg(hint);
                }
            }
        }

        let child = command.spawn().map_err(|e| WindowError::SpawnFailed {
            message: format!("'{}': {}", self.command, e),
        })?;

        info!(
            event = "host.window.presentation_spawned",
            window_id = id,
            pid = child.id(),
        );
        self.lock().insert(id, child);
        Ok(())
    }

    fn focus(&self, id: WindowId) -> Result<(), WindowError> {
        // The window manager owns focus for spawned surfaces.
        debug!(event = "host.window.focus_delegated", window_id = id);
        Ok(())
    }

    fn restore(&self, id: WindowId) -> Result<(), WindowError> {
        debug!(event = "host.window.restore_delegated", window_id = id);
        Ok(())
    }

    fn is_minimized(&self, _id: WindowId) -> bool {
        false
    }

    fn close(&self, id: WindowId) -> Result<(), WindowError> {
        let child = self.lock().remove(&id);
        match child {
            Some(mut child) => {
                if let Err(e) = child.kill() {
                    warn!(
                        event = "host.window.presentation_kill_failed",
                        window_id = id,
                        error = %e,
                    );
                }
                let _ = child.wait();
                debug!(event = "host.window.presentation_closed", window_id = id);
                Ok(())
            }
            None => Err(WindowError::WindowNotFound { id }),
        }
    }

    fn drain_closed(&self) -> Vec<WindowId> {
        let mut closed = Vec::new();
        let mut children = self.lock();

        children.retain(|&id, child| match child.try_wait() {
            Ok(Some(status)) => {
                debug!(
                    event = "host.window.presentation_exited",
                    window_id = id,
                    status = %status,
                );
                closed.push(id);
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!(
                    event = "host.window.presentation_wait_failed",
                    window_id = id,
                    error = %e,
                );
                closed.push(id);
                false
            }
        });

        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config() -> WindowConfig {
        WindowConfig {
            title: "Main window".to_string(),
            width: 800,
            height: 600,
            icon_path: None,
            preload_path: None,
            disable_hardware_acceleration: false,
        }
    }

    #[test]
    fn test_open_with_missing_command_fails() {
        let backend = ProcessWindowBackend::new("/nonexistent/presentation/command");
        let target = LoaderTarget::DevServer {
            url: "http://localhost:5173".to_string(),
            hint: None,
        };

        let result = backend.open(1, &test_config(), &target);
        assert!(matches!(result, Err(WindowError::SpawnFailed { .. })));
    }

    #[test]
    fn test_close_unknown_window_is_not_found() {
        let backend = ProcessWindowBackend::new("/bin/true");
        let result = backend.close(42);
        assert!(matches!(
            result,
            Err(WindowError::WindowNotFound { id: 42 })
        ));
    }

    #[test]
    fn test_drain_closed_reaps_exited_process() {
        let backend = ProcessWindowBackend::new("/bin/true");
        let target = LoaderTarget::Packaged {
            document: PathBuf::from("/app/dist/index.html"),
            hint: None,
        };

        backend.open(7, &test_config(), &target).unwrap();

        // /bin/true exits immediately; poll until the reaper sees it.
        let mut drained = Vec::new();
        for _ in 0..50 {
            drained = backend.drain_closed();
            if !drained.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert_eq!(drained, vec![7]);
        assert!(backend.drain_closed().is_empty());
    }
}
