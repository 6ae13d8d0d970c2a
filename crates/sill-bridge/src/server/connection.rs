use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::UnixStream;
use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::protocol::codec::{read_message, write_message};
use crate::protocol::messages::{HostMessage, SandboxMessage};
use crate::registry::CapabilityRegistry;
use crate::server::{PushFrame, SignalRouter};

/// Handle a single sandboxed-process connection.
///
/// Reads JSONL messages, dispatches calls to the registry and signals to
/// the router, and forwards host pushes. Replies and pushes share one
/// writer behind a mutex so frames never interleave.
pub(crate) async fn handle_connection(
    stream: UnixStream,
    registry: Arc<CapabilityRegistry>,
    router: Arc<SignalRouter>,
    pushes: broadcast::Receiver<PushFrame>,
    shutdown: CancellationToken,
) {
    debug!(event = "bridge.connection.accepted");

    let (reader, writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let writer = Arc::new(Mutex::new(writer));

    // Dropped on all exit paths below so the push task never outlives the
    // connection.
    let connection_done = shutdown.child_token();
    tokio::spawn(forward_pushes(
        pushes,
        writer.clone(),
        connection_done.clone(),
    ));

    loop {
        tokio::select! {
            result = read_message::<_, SandboxMessage>(&mut reader) => {
                match result {
                    Ok(Some(SandboxMessage::Call { id, channel, args })) => {
                        let response = registry.dispatch(id, &channel, &args).await;
                        let mut w = writer.lock().await;
                        if let Err(e) = write_message(&mut *w, &response).await {
                            error!(
                                event = "bridge.connection.write_failed",
                                channel = channel,
                                error = %e,
                            );
                            break;
                        }
                    }
                    Ok(Some(SandboxMessage::Signal { channel, args })) => {
                        router.dispatch(&channel, args);
                    }
                    Ok(None) => {
                        debug!(event = "bridge.connection.closed");
                        break;
                    }
                    Err(e) => {
                        warn!(event = "bridge.connection.read_error", error = %e);
                        break;
                    }
                }
            }
            _ = shutdown.cancelled() => {
                debug!(event = "bridge.connection.shutdown");
                break;
            }
        }
    }

    connection_done.cancel();
}

/// Forward broadcast pushes to one connection until it goes away.
async fn forward_pushes(
    mut pushes: broadcast::Receiver<PushFrame>,
    writer: Arc<Mutex<tokio::net::unix::OwnedWriteHalf>>,
    done: CancellationToken,
) {
    loop {
        tokio::select! {
            frame = pushes.recv() => {
                match frame {
                    Ok((channel, args)) => {
                        let msg = HostMessage::Push { channel, args };
                        let mut w = writer.lock().await;
                        if let Err(e) = write_message(&mut *w, &msg).await {
                            debug!(
                                event = "bridge.connection.push_write_failed",
                                error = %e,
                            );
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(
                            event = "bridge.connection.push_lagged",
                            skipped = skipped,
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
            _ = done.cancelled() => {
                break;
            }
        }
    }
}
