use std::path::PathBuf;

/// Host-assigned identifier for a presentation surface.
pub type WindowId = u64;

/// Whether a handle is the distinguished main window or a transient child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Main,
    Child,
}

/// Everything the backend needs to open a presentation surface.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Resolved icon path; validated to exist before the main window opens.
    pub icon_path: Option<PathBuf>,
    /// Script handed to the presentation process before any application
    /// script runs.
    pub preload_path: Option<PathBuf>,
    pub disable_hardware_acceleration: bool,
}

/// Opaque reference to a presentation surface, owned by the controller.
#[derive(Debug, Clone)]
pub struct WindowHandle {
    pub id: WindowId,
    pub kind: WindowKind,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_kind_distinguishes_main() {
        let handle = WindowHandle {
            id: 1,
            kind: WindowKind::Main,
            title: "Main window".to_string(),
        };
        assert_eq!(handle.kind, WindowKind::Main);
        assert_ne!(handle.kind, WindowKind::Child);
    }
}
