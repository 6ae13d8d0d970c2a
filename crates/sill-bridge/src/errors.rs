use sill_core::errors::SillError;

/// Transport-level bridge errors.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Host is not running")]
    HostNotRunning,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SillError for BridgeError {
    fn error_code(&self) -> &'static str {
        match self {
            BridgeError::HostNotRunning => "HOST_NOT_RUNNING",
            BridgeError::ConnectionFailed(_) => "CONNECTION_FAILED",
            BridgeError::ProtocolError(_) => "PROTOCOL_ERROR",
            BridgeError::SerializationFailed(_) => "SERIALIZATION_FAILED",
            BridgeError::Io { .. } => "BRIDGE_IO_ERROR",
        }
    }
}

/// Errors surfaced to callers of the sandbox-side gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A capability executor replied with a structured error.
    #[error("Capability call failed ({code}): {message}")]
    Call { code: String, message: String },

    /// The named channel has no registered capability on the host.
    #[error("Unknown capability '{channel}'")]
    UnknownCapability { channel: String },

    /// Source enumeration reported a value-level error object.
    #[error("Source enumeration failed: {message}")]
    EnumerationFailed { message: String },

    /// The connection closed while a call was pending.
    #[error("Gateway connection closed")]
    ConnectionClosed,

    /// The host replied with a value of an unexpected shape.
    #[error("Unexpected reply: {message}")]
    UnexpectedReply { message: String },

    #[error(transparent)]
    Transport(#[from] BridgeError),
}

impl GatewayError {
    /// Map a wire-level `call_error` to a typed gateway error.
    pub(crate) fn from_wire(channel: &str, code: String, message: String) -> Self {
        match code.as_str() {
            "unknown_capability" => GatewayError::UnknownCapability {
                channel: channel.to_string(),
            },
            _ => GatewayError::Call { code, message },
        }
    }
}

impl SillError for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Call { .. } => "CAPABILITY_CALL_FAILED",
            GatewayError::UnknownCapability { .. } => "UNKNOWN_CAPABILITY",
            GatewayError::EnumerationFailed { .. } => "SOURCE_ENUMERATION_FAILED",
            GatewayError::ConnectionClosed => "GATEWAY_CONNECTION_CLOSED",
            GatewayError::UnexpectedReply { .. } => "UNEXPECTED_REPLY",
            GatewayError::Transport(_) => "BRIDGE_TRANSPORT_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire_unknown_capability() {
        let error = GatewayError::from_wire(
            "no-such-channel",
            "unknown_capability".to_string(),
            "No capability registered".to_string(),
        );
        assert!(matches!(
            error,
            GatewayError::UnknownCapability { ref channel } if channel == "no-such-channel"
        ));
    }

    #[test]
    fn test_from_wire_other_code_maps_to_call_error() {
        let error = GatewayError::from_wire(
            "electronMain:screen:getSources",
            "capability_failed".to_string(),
            "boom".to_string(),
        );
        assert!(matches!(error, GatewayError::Call { ref code, .. } if code == "capability_failed"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(BridgeError::HostNotRunning.error_code(), "HOST_NOT_RUNNING");
        assert_eq!(
            GatewayError::ConnectionClosed.error_code(),
            "GATEWAY_CONNECTION_CLOSED"
        );
    }
}
