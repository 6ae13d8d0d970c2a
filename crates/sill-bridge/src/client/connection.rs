use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use serde_json::Value;
use tokio::io::BufReader;
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, warn};

use crate::errors::{BridgeError, GatewayError};
use crate::protocol::codec::{read_message, write_message};
use crate::protocol::messages::{HostMessage, SandboxMessage};

type PushCallback = Arc<dyn Fn(&[Value]) + Send + Sync>;

struct PushListener {
    token: u64,
    callback: PushCallback,
}

/// Identifies one registered push listener.
///
/// Passing the handle to [`BridgeGateway::unsubscribe`] removes exactly
/// that listener; a second unsubscribe with the same handle is a no-op.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    channel: String,
    token: u64,
}

struct GatewayShared {
    writer: Mutex<OwnedWriteHalf>,
    pending: StdMutex<HashMap<String, oneshot::Sender<HostMessage>>>,
    listeners: StdMutex<HashMap<String, Vec<PushListener>>>,
    next_id: AtomicU64,
    next_token: AtomicU64,
    closed: AtomicBool,
}

impl GatewayShared {
    fn lock_pending(&self) -> MutexGuard<'_, HashMap<String, oneshot::Sender<HostMessage>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_listeners(&self) -> MutexGuard<'_, HashMap<String, Vec<PushListener>>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn take_pending(&self, id: &str) -> Option<oneshot::Sender<HostMessage>> {
        self.lock_pending().remove(id)
    }

    /// Drop every pending reply slot so suspended calls resolve with a
    /// connection error instead of hanging.
    fn fail_pending(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.lock_pending().clear();
    }

    fn deliver_push(&self, channel: &str, args: &[Value]) {
        // Snapshot under the lock, invoke outside it: listeners may
        // subscribe or unsubscribe from inside a callback.
        let callbacks: Vec<PushCallback> = {
            let listeners = self.lock_listeners();
            match listeners.get(channel) {
                Some(registered) => registered.iter().map(|l| l.callback.clone()).collect(),
                None => return,
            }
        };

        for callback in callbacks {
            callback(args);
        }
    }
}

/// The message-passing surface available to sandboxed code.
///
/// `call` suspends the invoking task until the host replies; `signal`
/// never suspends. No timeout is imposed here - a capability that never
/// responds leaves the call pending until the connection closes. Callers
/// that need a bound race `tokio::time::timeout` against the call.
pub struct BridgeGateway {
    shared: Arc<GatewayShared>,
    reader_task: tokio::task::JoinHandle<()>,
}

impl BridgeGateway {
    /// Connect to the host at the given socket path.
    pub async fn connect(socket_path: &Path) -> Result<Self, BridgeError> {
        let stream = UnixStream::connect(socket_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionRefused
                || e.kind() == std::io::ErrorKind::NotFound
            {
                BridgeError::HostNotRunning
            } else {
                BridgeError::ConnectionFailed(e.to_string())
            }
        })?;

        let (reader, writer) = stream.into_split();

        let shared = Arc::new(GatewayShared {
            writer: Mutex::new(writer),
            pending: StdMutex::new(HashMap::new()),
            listeners: StdMutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            next_token: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        });

        let reader_task = tokio::spawn(run_reader(BufReader::new(reader), shared.clone()));

        debug!(
            event = "bridge.gateway.connected",
            socket = %socket_path.display(),
        );

        Ok(Self {
            shared,
            reader_task,
        })
    }

    /// Request/response on a named channel.
    ///
    /// Resolves exactly once, with the capability's value or a structured
    /// error. A call naming an unregistered channel resolves with
    /// [`GatewayError::UnknownCapability`]; it never hangs for that reason
    /// and never fails synchronously.
    pub async fn call(&self, channel: &str, args: Vec<Value>) -> Result<Value, GatewayError> {
        if self.shared.closed.load(Ordering::SeqCst) {
            return Err(GatewayError::ConnectionClosed);
        }

        let id = format!("req-{}", self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        self.shared.lock_pending().insert(id.clone(), tx);

        let msg = SandboxMessage::Call {
            id: id.clone(),
            channel: channel.to_string(),
            args,
        };

        {
            let mut writer = self.shared.writer.lock().await;
            if let Err(e) = write_message(&mut *writer, &msg).await {
                self.shared.take_pending(&id);
                return Err(GatewayError::Transport(e));
            }
        }

        // The reader may have observed EOF between the insert and the
        // write; drop our own slot so the await below resolves.
        if self.shared.closed.load(Ordering::SeqCst) {
            self.shared.take_pending(&id);
        }

        match rx.await {
            Ok(HostMessage::CallResult { value, .. }) => Ok(value),
            Ok(HostMessage::CallError { code, message, .. }) => {
                Err(GatewayError::from_wire(channel, code, message))
            }
            Ok(HostMessage::Push { .. }) => Err(GatewayError::UnexpectedReply {
                message: "push delivered to a pending call".to_string(),
            }),
            Err(_) => Err(GatewayError::ConnectionClosed),
        }
    }

    /// Fire-and-forget on a named channel. FIFO per channel, no reply.
    pub async fn signal(&self, channel: &str, args: Vec<Value>) -> Result<(), GatewayError> {
        if self.shared.closed.load(Ordering::SeqCst) {
            return Err(GatewayError::ConnectionClosed);
        }

        let msg = SandboxMessage::Signal {
            channel: channel.to_string(),
            args,
        };

        let mut writer = self.shared.writer.lock().await;
        write_message(&mut *writer, &msg)
            .await
            .map_err(GatewayError::Transport)
    }

    /// Register a listener for host pushes on a named channel.
    ///
    /// Multiple listeners per channel are allowed; delivery order matches
    /// registration order.
    pub fn subscribe<F>(&self, channel: &str, listener: F) -> SubscriptionHandle
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        let token = self.shared.next_token.fetch_add(1, Ordering::Relaxed);
        self.shared
            .lock_listeners()
            .entry(channel.to_string())
            .or_default()
            .push(PushListener {
                token,
                callback: Arc::new(listener),
            });

        SubscriptionHandle {
            channel: channel.to_string(),
            token,
        }
    }

    /// Remove exactly the listener identified by the handle.
    ///
    /// Safe to call multiple times: once removed, further calls are
    /// idempotent no-ops.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) {
        let mut listeners = self.shared.lock_listeners();
        if let Some(registered) = listeners.get_mut(&handle.channel) {
            registered.retain(|l| l.token != handle.token);
            if registered.is_empty() {
                listeners.remove(&handle.channel);
            }
        }
    }
}

impl Drop for BridgeGateway {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

/// Background reader: routes replies to their pending slots and pushes to
/// channel listeners, in arrival order.
async fn run_reader(mut reader: BufReader<OwnedReadHalf>, shared: Arc<GatewayShared>) {
    loop {
        match read_message::<_, HostMessage>(&mut reader).await {
            Ok(Some(HostMessage::Push { channel, args })) => {
                shared.deliver_push(&channel, &args);
            }
            Ok(Some(reply)) => {
                let Some(id) = reply.id().map(str::to_string) else {
                    continue;
                };
                match shared.take_pending(&id) {
                    Some(tx) => {
                        // Receiver dropped means the caller gave up (e.g.
                        // a timeout raced the reply); nothing to do.
                        let _ = tx.send(reply);
                    }
                    None => warn!(event = "bridge.gateway.unmatched_reply", id = %id),
                }
            }
            Ok(None) => {
                debug!(event = "bridge.gateway.closed");
                break;
            }
            Err(e) => {
                warn!(event = "bridge.gateway.read_error", error = %e);
                break;
            }
        }
    }

    shared.fail_pending();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_handle_is_cloneable() {
        let handle = SubscriptionHandle {
            channel: "main-process-message".to_string(),
            token: 7,
        };
        let copy = handle.clone();
        assert_eq!(copy.channel, handle.channel);
        assert_eq!(copy.token, handle.token);
    }
}
