//! The host process controller.
//!
//! One owned context struct holds every piece of process-wide mutable
//! state: the window table, the at-most-one main window, and the backend
//! and loader seams. It is created once at startup and shared behind a
//! single lock; there are no module-level globals.
//!
//! Lifecycle handlers are fired by the OS/runtime, never by user code,
//! and must not crash the process: their failures are logged and
//! swallowed. Window *creation* failures, by contrast, propagate - a
//! missing icon at startup is fatal.

pub mod routes;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use sill_bridge::{PushSender, channels};

use crate::loader::LoaderSettings;
use crate::windows::backends::WindowBackend;
use crate::windows::errors::WindowError;
use crate::windows::types::{WindowConfig, WindowHandle, WindowId, WindowKind};

/// The desktop platform the host runs on. Injectable so lifecycle
/// decisions are testable on any build host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopPlatform {
    MacOs,
    Windows,
    Linux,
}

impl DesktopPlatform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            DesktopPlatform::MacOs
        } else if cfg!(target_os = "windows") {
            DesktopPlatform::Windows
        } else {
            DesktopPlatform::Linux
        }
    }

    /// Dock-style background persistence: the process stays alive with
    /// zero windows.
    pub fn stays_resident_without_windows(self) -> bool {
        matches!(self, DesktopPlatform::MacOs)
    }
}

/// What the process should do after a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownDecision {
    Exit,
    StayResident,
}

/// Owns the window table and the main-window singleton.
pub struct HostController {
    backend: Arc<dyn WindowBackend>,
    push: PushSender,
    platform: DesktopPlatform,
    window_config: WindowConfig,
    loader: LoaderSettings,
    windows: BTreeMap<WindowId, WindowHandle>,
    main_window: Option<WindowId>,
    next_window_id: WindowId,
}

impl HostController {
    pub fn new(
        backend: Arc<dyn WindowBackend>,
        push: PushSender,
        platform: DesktopPlatform,
        window_config: WindowConfig,
        loader: LoaderSettings,
    ) -> Self {
        Self {
            backend,
            push,
            platform,
            window_config,
            loader,
            windows: BTreeMap::new(),
            main_window: None,
            next_window_id: 1,
        }
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn main_window(&self) -> Option<WindowId> {
        self.main_window
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowHandle> {
        self.windows.get(&id)
    }

    fn alloc_window_id(&mut self) -> WindowId {
        let id = self.next_window_id;
        self.next_window_id += 1;
        id
    }

    /// Create the distinguished main window.
    ///
    /// Failures here are fatal startup errors and propagate to the
    /// caller. On success the ready push goes out with a timestamp.
    pub fn create_main_window(&mut self) -> Result<WindowId, WindowError> {
        if let Some(icon) = &self.window_config.icon_path {
            if !icon.exists() {
                return Err(WindowError::IconMissing { path: icon.clone() });
            }
        }

        let id = self.alloc_window_id();
        let target = self.loader.target(None);
        self.backend.open(id, &self.window_config, &target)?;

        self.windows.insert(
            id,
            WindowHandle {
                id,
                kind: WindowKind::Main,
                title: self.window_config.title.clone(),
            },
        );
        self.main_window = Some(id);

        info!(
            event = "host.window.main_created",
            window_id = id,
            target = %target.describe(),
        );

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.push
            .push(channels::MAIN_PROCESS_MESSAGE, vec![Value::String(timestamp)]);

        Ok(id)
    }

    /// Create an auxiliary window for a navigation hint.
    ///
    /// Child windows are not singleton and are not referenced after
    /// creation except by the backend itself.
    pub fn create_child_window(&mut self, hint: &str) -> Result<WindowId, WindowError> {
        let id = self.alloc_window_id();
        let target = self.loader.target(Some(hint));
        self.backend.open(id, &self.window_config, &target)?;

        self.windows.insert(
            id,
            WindowHandle {
                id,
                kind: WindowKind::Child,
                title: self.window_config.title.clone(),
            },
        );

        info!(
            event = "host.window.child_created",
            window_id = id,
            target = %target.describe(),
        );
        Ok(id)
    }

    /// A second process tried to start: surface the main window.
    ///
    /// Never creates a window. Backend failures are logged and swallowed.
    pub fn on_second_instance(&mut self) {
        let Some(id) = self.main_window else {
            debug!(event = "host.lifecycle.second_instance_no_main_window");
            return;
        };

        if self.backend.is_minimized(id) {
            if let Err(e) = self.backend.restore(id) {
                warn!(
                    event = "host.lifecycle.restore_failed",
                    window_id = id,
                    error = %e,
                );
            }
        }
        if let Err(e) = self.backend.focus(id) {
            warn!(
                event = "host.lifecycle.focus_failed",
                window_id = id,
                error = %e,
            );
        }

        info!(event = "host.lifecycle.second_instance_focused", window_id = id);
    }

    /// Dock/taskbar activation: create the main window when none exists,
    /// otherwise focus the first existing window.
    pub fn on_activate(&mut self) {
        if self.windows.is_empty() {
            if let Err(e) = self.create_main_window() {
                error!(event = "host.lifecycle.activate_failed", error = %e);
            }
            return;
        }

        if let Some((&id, _)) = self.windows.iter().next() {
            if let Err(e) = self.backend.focus(id) {
                warn!(
                    event = "host.lifecycle.focus_failed",
                    window_id = id,
                    error = %e,
                );
            }
        }
    }

    /// A native surface closed; drop its handle.
    pub fn on_window_closed(&mut self, id: WindowId) -> ShutdownDecision {
        if self.windows.remove(&id).is_none() {
            debug!(event = "host.lifecycle.unknown_window_closed", window_id = id);
        }
        if self.main_window == Some(id) {
            self.main_window = None;
        }

        if self.windows.is_empty() {
            self.on_all_windows_closed()
        } else {
            ShutdownDecision::StayResident
        }
    }

    /// Every window is gone: exit everywhere except the platform with
    /// dock-style background persistence.
    pub fn on_all_windows_closed(&mut self) -> ShutdownDecision {
        self.main_window = None;

        if self.platform.stays_resident_without_windows() {
            info!(event = "host.lifecycle.staying_resident");
            ShutdownDecision::StayResident
        } else {
            info!(event = "host.lifecycle.all_windows_closed_exit");
            ShutdownDecision::Exit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::windows::backends::HeadlessWindowBackend;

    fn test_controller(platform: DesktopPlatform) -> HostController {
        let config = WindowConfig {
            title: "Main window".to_string(),
            width: 800,
            height: 600,
            icon_path: None,
            preload_path: None,
            disable_hardware_acceleration: false,
        };
        HostController::new(
            Arc::new(HeadlessWindowBackend::new()),
            PushSender::new(16),
            platform,
            config,
            LoaderSettings::new(None, PathBuf::from("/app/dist/index.html")),
        )
    }

    #[test]
    fn test_create_main_window_registers_singleton() {
        let mut controller = test_controller(DesktopPlatform::Linux);
        let id = controller.create_main_window().unwrap();
        assert_eq!(controller.main_window(), Some(id));
        assert_eq!(controller.window_count(), 1);
        assert_eq!(controller.window(id).unwrap().kind, WindowKind::Main);
    }

    #[test]
    fn test_create_main_window_missing_icon_is_fatal() {
        let mut controller = test_controller(DesktopPlatform::Linux);
        controller.window_config.icon_path =
            Some(PathBuf::from("/nonexistent/public/favicon.ico"));

        let result = controller.create_main_window();
        assert!(matches!(result, Err(WindowError::IconMissing { .. })));
        assert_eq!(controller.window_count(), 0, "no window on fatal error");
        assert_eq!(controller.main_window(), None);
    }

    #[test]
    fn test_child_windows_are_not_singleton() {
        let mut controller = test_controller(DesktopPlatform::Linux);
        let main = controller.create_main_window().unwrap();
        let child_a = controller.create_child_window("settings").unwrap();
        let child_b = controller.create_child_window("about").unwrap();

        assert_eq!(controller.window_count(), 3);
        assert_eq!(controller.main_window(), Some(main));
        assert_eq!(controller.window(child_a).unwrap().kind, WindowKind::Child);
        assert_eq!(controller.window(child_b).unwrap().kind, WindowKind::Child);
    }

    #[test]
    fn test_all_windows_closed_exits_except_on_macos() {
        let mut linux = test_controller(DesktopPlatform::Linux);
        assert_eq!(linux.on_all_windows_closed(), ShutdownDecision::Exit);

        let mut windows = test_controller(DesktopPlatform::Windows);
        assert_eq!(windows.on_all_windows_closed(), ShutdownDecision::Exit);

        let mut macos = test_controller(DesktopPlatform::MacOs);
        assert_eq!(
            macos.on_all_windows_closed(),
            ShutdownDecision::StayResident
        );
    }

    #[test]
    fn test_closing_last_window_clears_main_reference() {
        let mut controller = test_controller(DesktopPlatform::Linux);
        let id = controller.create_main_window().unwrap();

        let decision = controller.on_window_closed(id);
        assert_eq!(decision, ShutdownDecision::Exit);
        assert_eq!(controller.main_window(), None);
        assert_eq!(controller.window_count(), 0);
    }

    #[test]
    fn test_closing_child_keeps_process_alive() {
        let mut controller = test_controller(DesktopPlatform::Linux);
        controller.create_main_window().unwrap();
        let child = controller.create_child_window("settings").unwrap();

        let decision = controller.on_window_closed(child);
        assert_eq!(decision, ShutdownDecision::StayResident);
        assert_eq!(controller.window_count(), 1);
    }

    #[test]
    fn test_activate_with_no_windows_creates_main() {
        let mut controller = test_controller(DesktopPlatform::MacOs);
        assert_eq!(controller.window_count(), 0);

        controller.on_activate();
        assert_eq!(controller.window_count(), 1);
        assert!(controller.main_window().is_some());
    }

    #[test]
    fn test_activate_with_windows_does_not_create_another() {
        let mut controller = test_controller(DesktopPlatform::MacOs);
        controller.create_main_window().unwrap();

        controller.on_activate();
        assert_eq!(controller.window_count(), 1);
    }

    #[test]
    fn test_second_instance_never_creates_a_window() {
        let mut controller = test_controller(DesktopPlatform::Linux);

        // Without a main window it is a no-op
        controller.on_second_instance();
        assert_eq!(controller.window_count(), 0);

        controller.create_main_window().unwrap();
        controller.on_second_instance();
        assert_eq!(controller.window_count(), 1);
    }
}
