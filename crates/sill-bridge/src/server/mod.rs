//! Host-side gateway server.
//!
//! Accepts sandboxed presentation processes on the instance-lock socket
//! and serves each connection until it closes or shutdown is requested.

pub mod connection;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::net::UnixListener;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::BridgeError;
use crate::registry::CapabilityRegistry;

/// One host-initiated push: channel name plus its arguments.
pub(crate) type PushFrame = (String, Vec<Value>);

/// Fan-out handle for host -> sandbox pushes.
///
/// Every connection subscribes to the same broadcast stream, so pushes on
/// one channel reach all sandboxes in send order.
#[derive(Clone)]
pub struct PushSender {
    tx: broadcast::Sender<PushFrame>,
}

impl PushSender {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Push to all connected sandboxes. A push with no subscribers is
    /// dropped silently.
    pub fn push(&self, channel: &str, args: Vec<Value>) {
        match self.tx.send((channel.to_string(), args)) {
            Ok(receivers) => debug!(
                event = "bridge.push.sent",
                channel = channel,
                receivers = receivers
            ),
            Err(_) => debug!(event = "bridge.push.no_subscribers", channel = channel),
        }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<PushFrame> {
        self.tx.subscribe()
    }
}

type SignalHandler = Box<dyn Fn(Vec<Value>) + Send + Sync>;

/// Closed routing table for sandbox -> host signals.
///
/// Routes are wired once at host startup; a signal naming an unrouted
/// channel is logged and dropped. Handlers run on the connection's reader
/// task in arrival order, which gives FIFO delivery per channel.
pub struct SignalRouter {
    routes: HashMap<String, SignalHandler>,
}

impl SignalRouter {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Register the handler for a signal channel. Handlers must not block;
    /// long work belongs on a spawned task.
    pub fn route_to<F>(&mut self, channel: &str, handler: F)
    where
        F: Fn(Vec<Value>) + Send + Sync + 'static,
    {
        self.routes.insert(channel.to_string(), Box::new(handler));
    }

    pub(crate) fn dispatch(&self, channel: &str, args: Vec<Value>) {
        match self.routes.get(channel) {
            Some(handler) => {
                debug!(event = "bridge.signal.routed", channel = channel);
                handler(args);
            }
            None => warn!(event = "bridge.signal.unrouted", channel = channel),
        }
    }
}

impl Default for SignalRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve the bridge until shutdown.
///
/// Consumes the listener acquired by the instance lock; each accepted
/// connection is handled on its own task.
pub async fn run_server(
    listener: UnixListener,
    registry: Arc<CapabilityRegistry>,
    router: Arc<SignalRouter>,
    push: PushSender,
    shutdown: CancellationToken,
) -> Result<(), BridgeError> {
    info!(event = "bridge.server.started");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _addr)) => {
                        tokio::spawn(connection::handle_connection(
                            stream,
                            registry.clone(),
                            router.clone(),
                            push.subscribe(),
                            shutdown.clone(),
                        ));
                    }
                    Err(e) => {
                        warn!(event = "bridge.server.accept_failed", error = %e);
                    }
                }
            }
            _ = shutdown.cancelled() => {
                break;
            }
        }
    }

    info!(event = "bridge.server.stopped");
    Ok(())
}
