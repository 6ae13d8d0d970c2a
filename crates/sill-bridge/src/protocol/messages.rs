use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sandbox -> host messages.
///
/// Each variant maps to a JSONL message with `"type"` as the tag field.
/// The transport is generic on purpose: a small, closed set of call
/// shapes, with capability dispatch by channel name on the host side.
/// Only `call` carries an `id`; it is generated internally by the gateway
/// and echoed in exactly one reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SandboxMessage {
    /// Request/response: the host replies with `call_result` or
    /// `call_error` carrying the same `id`.
    #[serde(rename = "call")]
    Call {
        id: String,
        channel: String,
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Fire-and-forget. No `id`, no reply. FIFO per channel.
    #[serde(rename = "signal")]
    Signal {
        channel: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

/// Host -> sandbox messages.
///
/// Responses echo the request `id`. Pushes have no `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    #[serde(rename = "call_result")]
    CallResult { id: String, value: Value },

    /// Structured error data. Capability failures and unknown channel
    /// names both arrive this way; nothing else crosses the boundary.
    #[serde(rename = "call_error")]
    CallError {
        id: String,
        code: String,
        message: String,
    },

    /// Host-initiated push. No `id` - delivered to channel subscribers.
    #[serde(rename = "push")]
    Push {
        channel: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

impl HostMessage {
    /// Extract the request id from a reply message, if it has one.
    pub fn id(&self) -> Option<&str> {
        match self {
            HostMessage::CallResult { id, .. } | HostMessage::CallError { id, .. } => Some(id),
            HostMessage::Push { .. } => None,
        }
    }
}
