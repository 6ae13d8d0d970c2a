//! The single-instance lock.
//!
//! The bridge socket doubles as the lock: whoever binds it is the sole
//! instance. A process that finds a live owner must announce itself with
//! a `second-instance` signal and terminate with no side effects - no
//! window, no registry. A socket file whose owner no longer answers is
//! stale and gets reclaimed.
//!
//! The lock is released implicitly on process exit; graceful shutdown
//! also unlinks the socket file.

use std::path::{Path, PathBuf};

use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

use sill_bridge::{BridgeGateway, channels};
use sill_core::errors::SillError;

/// Outcome of an acquisition attempt.
pub enum InstanceLock {
    /// This process is the sole instance and owns the bridge listener.
    Acquired(UnixListener),
    /// Another live instance holds the lock. The caller must terminate
    /// without creating any window.
    AlreadyRunning,
}

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("Failed to prepare runtime directory '{}': {message}", path.display())]
    RuntimeDirFailed { path: PathBuf, message: String },

    #[error("Failed to bind instance socket '{}': {message}", path.display())]
    BindFailed { path: PathBuf, message: String },

    #[error("Failed to reach the running instance: {0}")]
    NotifyFailed(String),
}

impl SillError for InstanceError {
    fn error_code(&self) -> &'static str {
        match self {
            InstanceError::RuntimeDirFailed { .. } => "INSTANCE_RUNTIME_DIR_FAILED",
            InstanceError::BindFailed { .. } => "INSTANCE_BIND_FAILED",
            InstanceError::NotifyFailed(_) => "INSTANCE_NOTIFY_FAILED",
        }
    }
}

/// Attempt to become the sole instance.
///
/// Runs to completion before any window is created. No retry: a live
/// owner means `AlreadyRunning`, everything else is an error.
pub async fn acquire_instance_lock(socket_path: &Path) -> Result<InstanceLock, InstanceError> {
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| InstanceError::RuntimeDirFailed {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }

    match UnixListener::bind(socket_path) {
        Ok(listener) => {
            info!(
                event = "host.instance.lock_acquired",
                socket = %socket_path.display(),
            );
            Ok(InstanceLock::Acquired(listener))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            // A socket file exists. A live owner accepts the probe; a
            // stale file refuses and gets reclaimed.
            match UnixStream::connect(socket_path).await {
                Ok(_probe) => {
                    info!(
                        event = "host.instance.already_running",
                        socket = %socket_path.display(),
                    );
                    Ok(InstanceLock::AlreadyRunning)
                }
                Err(probe) if is_dead_socket(&probe) => {
                    warn!(
                        event = "host.instance.stale_socket_reclaimed",
                        socket = %socket_path.display(),
                    );
                    std::fs::remove_file(socket_path).map_err(|e| InstanceError::BindFailed {
                        path: socket_path.to_path_buf(),
                        message: format!("failed to remove stale socket: {}", e),
                    })?;
                    let listener =
                        UnixListener::bind(socket_path).map_err(|e| InstanceError::BindFailed {
                            path: socket_path.to_path_buf(),
                            message: e.to_string(),
                        })?;
                    info!(
                        event = "host.instance.lock_acquired",
                        socket = %socket_path.display(),
                    );
                    Ok(InstanceLock::Acquired(listener))
                }
                Err(probe) => Err(InstanceError::BindFailed {
                    path: socket_path.to_path_buf(),
                    message: probe.to_string(),
                }),
            }
        }
        Err(e) => Err(InstanceError::BindFailed {
            path: socket_path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

fn is_dead_socket(probe: &std::io::Error) -> bool {
    matches!(
        probe.kind(),
        std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound
    )
}

/// Deliver the `second-instance` signal to the running host.
pub async fn notify_running_instance(socket_path: &Path) -> Result<(), InstanceError> {
    let gateway = BridgeGateway::connect(socket_path)
        .await
        .map_err(|e| InstanceError::NotifyFailed(e.to_string()))?;
    gateway
        .signal(channels::SECOND_INSTANCE, Vec::new())
        .await
        .map_err(|e| InstanceError::NotifyFailed(e.to_string()))?;

    info!(event = "host.instance.second_instance_notified");
    Ok(())
}

/// Unlink the socket file on graceful shutdown.
pub fn release_instance_lock(socket_path: &Path) {
    match std::fs::remove_file(socket_path) {
        Ok(()) => debug!(
            event = "host.instance.lock_released",
            socket = %socket_path.display(),
        ),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            event = "host.instance.release_failed",
            socket = %socket_path.display(),
            error = %e,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_on_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("host.sock");

        let lock = acquire_instance_lock(&socket).await.unwrap();
        assert!(matches!(lock, InstanceLock::Acquired(_)));
        assert!(socket.exists());
    }

    #[tokio::test]
    async fn test_second_acquisition_sees_running_instance() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("host.sock");

        let first = acquire_instance_lock(&socket).await.unwrap();
        let InstanceLock::Acquired(listener) = first else {
            panic!("first acquisition should win");
        };

        // Keep the listener accepting so the probe connects.
        let accept_task = tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let second = acquire_instance_lock(&socket).await.unwrap();
        assert!(matches!(second, InstanceLock::AlreadyRunning));

        accept_task.abort();
    }

    #[tokio::test]
    async fn test_stale_socket_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("host.sock");

        // Bind then drop: the file stays behind with no owner.
        {
            let lock = acquire_instance_lock(&socket).await.unwrap();
            let InstanceLock::Acquired(listener) = lock else {
                panic!("first acquisition should win");
            };
            drop(listener);
        }
        assert!(socket.exists(), "dropping the listener leaves the file");

        let lock = acquire_instance_lock(&socket).await.unwrap();
        assert!(matches!(lock, InstanceLock::Acquired(_)));
    }

    #[tokio::test]
    async fn test_release_removes_socket_file() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("host.sock");

        let _lock = acquire_instance_lock(&socket).await.unwrap();
        assert!(socket.exists());

        release_instance_lock(&socket);
        assert!(!socket.exists());

        // Releasing again is harmless
        release_instance_lock(&socket);
    }
}
