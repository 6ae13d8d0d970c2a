//! Named capability wrappers.
//!
//! Thin fixed bindings over the generic `call`/`signal` primitives, one
//! per registered capability. Sandboxed application code goes through
//! these rather than naming channels directly, which keeps the reviewed
//! capability surface closed.

use serde_json::Value;

use sill_core::capture::types::CaptureSourceRecord;

use crate::client::connection::BridgeGateway;
use crate::errors::GatewayError;
use crate::protocol::channels;

impl BridgeGateway {
    /// Ask the host to open the OS screen-recording privacy settings.
    ///
    /// Best effort: resolves once the host has attempted the action.
    pub async fn open_screen_security(&self) -> Result<(), GatewayError> {
        self.call(channels::OPEN_SCREEN_SECURITY, Vec::new())
            .await
            .map(|_| ())
    }

    /// Whether screen-recording access is currently granted.
    ///
    /// Platforms without a gating concept always report `true`.
    pub async fn get_screen_access(&self) -> Result<bool, GatewayError> {
        let value = self.call(channels::GET_SCREEN_ACCESS, Vec::new()).await?;
        value.as_bool().ok_or_else(|| GatewayError::UnexpectedReply {
            message: format!("expected boolean, got {}", value),
        })
    }

    /// Snapshot of all capturable screens and windows with thumbnails.
    ///
    /// A value-level `{error}` reply from the host surfaces as
    /// [`GatewayError::EnumerationFailed`].
    pub async fn get_screen_sources(&self) -> Result<Vec<CaptureSourceRecord>, GatewayError> {
        let value = self.call(channels::GET_SCREEN_SOURCES, Vec::new()).await?;

        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(GatewayError::EnumerationFailed {
                message: message.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| GatewayError::UnexpectedReply {
            message: e.to_string(),
        })
    }

    /// Ask the host to open a child window for a navigation hint.
    pub async fn open_window(&self, hint: &str) -> Result<(), GatewayError> {
        self.signal(channels::OPEN_WIN, vec![Value::String(hint.to_string())])
            .await
    }
}
