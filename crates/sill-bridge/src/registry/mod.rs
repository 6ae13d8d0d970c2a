//! The capability registry: the fixed catalogue of privileged operations.
//!
//! The table is built once at host startup and never mutated. Dispatch
//! rejects unknown channel names explicitly, and every executor converts
//! internal failures into structured data before anything crosses the
//! process boundary.

use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::{debug, warn};

use sill_core::capture;

use crate::protocol::channels;
use crate::protocol::messages::HostMessage;

/// The privileged operations the host exposes to sandboxed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CapabilityKind {
    OpenScreenSecurity,
    GetScreenAccess,
    GetScreenSources,
}

/// Immutable mapping from channel name to capability executor.
pub struct CapabilityRegistry {
    entries: HashMap<&'static str, CapabilityKind>,
}

impl CapabilityRegistry {
    /// Build the registry with the full built-in capability set.
    pub fn with_builtin() -> Self {
        let entries = HashMap::from([
            (
                channels::OPEN_SCREEN_SECURITY,
                CapabilityKind::OpenScreenSecurity,
            ),
            (channels::GET_SCREEN_ACCESS, CapabilityKind::GetScreenAccess),
            (
                channels::GET_SCREEN_SOURCES,
                CapabilityKind::GetScreenSources,
            ),
        ]);
        Self { entries }
    }

    /// Whether a channel name resolves to a registered capability.
    pub fn contains(&self, channel: &str) -> bool {
        self.entries.contains_key(channel)
    }

    /// Execute the capability registered for `channel` and build the reply.
    ///
    /// Unknown names resolve with an `unknown_capability` error reply
    /// rather than hanging. Compositor work runs on the blocking pool so
    /// the host loop stays responsive.
    pub async fn dispatch(&self, id: String, channel: &str, _args: &[Value]) -> HostMessage {
        let Some(kind) = self.entries.get(channel).copied() else {
            warn!(event = "bridge.registry.unknown_capability", channel = channel);
            return HostMessage::CallError {
                id,
                code: "unknown_capability".to_string(),
                message: format!("No capability registered for channel '{}'", channel),
            };
        };

        debug!(event = "bridge.registry.dispatch", channel = channel);

        match kind {
            CapabilityKind::OpenScreenSecurity => {
                // Best-effort OS action; failures are swallowed inside.
                let joined =
                    tokio::task::spawn_blocking(capture::open_screen_privacy_settings).await;
                if let Err(e) = joined {
                    warn!(event = "bridge.registry.executor_panicked", channel = channel, error = %e);
                }
                HostMessage::CallResult {
                    id,
                    value: Value::Null,
                }
            }

            CapabilityKind::GetScreenAccess => {
                // Never fails: platforms without a gating concept report true.
                let granted = tokio::task::spawn_blocking(capture::screen_access_granted)
                    .await
                    .unwrap_or(true);
                HostMessage::CallResult {
                    id,
                    value: Value::Bool(granted),
                }
            }

            CapabilityKind::GetScreenSources => {
                let value = match tokio::task::spawn_blocking(capture::enumerate_capture_sources)
                    .await
                {
                    Ok(Ok(sources)) => serde_json::to_value(&sources)
                        .unwrap_or_else(|e| json!({ "error": e.to_string() })),
                    Ok(Err(e)) => {
                        warn!(event = "bridge.registry.enumeration_failed", error = %e);
                        json!({ "error": e.to_string() })
                    }
                    Err(e) => {
                        warn!(event = "bridge.registry.executor_panicked", channel = channel, error = %e);
                        json!({ "error": e.to_string() })
                    }
                };
                // Enumeration failure is a value-level error object, not a
                // call_error - the caller's promise resolves either way.
                HostMessage::CallResult { id, value }
            }
        }
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
