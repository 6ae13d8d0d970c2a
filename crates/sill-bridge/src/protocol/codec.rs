//! Newline-delimited JSON framing for bridge messages.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::BridgeError;

/// Serialize a message and write it as one JSONL frame.
pub async fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut payload =
        serde_json::to_vec(msg).map_err(|e| BridgeError::SerializationFailed(e.to_string()))?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read the next JSONL frame.
///
/// Returns `Ok(None)` when the peer closed the connection. Blank lines
/// between frames are skipped.
pub async fn read_message<R, T>(reader: &mut R) -> Result<Option<T>, BridgeError>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Ok(None);
        }

        let frame = line.trim();
        if frame.is_empty() {
            continue;
        }

        return serde_json::from_str(frame)
            .map(Some)
            .map_err(|e| BridgeError::ProtocolError(format!("invalid message: {}", e)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::{HostMessage, SandboxMessage};
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let mut buffer = Vec::new();
        let msg = SandboxMessage::Signal {
            channel: "open-win".to_string(),
            args: vec![],
        };
        write_message(&mut buffer, &msg).await.unwrap();
        assert!(buffer.ends_with(b"\n"));

        let mut reader = BufReader::new(buffer.as_slice());
        let parsed: SandboxMessage = read_message(&mut reader).await.unwrap().unwrap();
        if let SandboxMessage::Signal { channel, .. } = parsed {
            assert_eq!(channel, "open-win");
        } else {
            panic!("wrong variant");
        }
    }

    #[tokio::test]
    async fn test_read_eof_returns_none() {
        let mut reader = BufReader::new(&b""[..]);
        let result: Option<HostMessage> = read_message(&mut reader).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_read_skips_blank_lines() {
        let data = b"\n\n{\"type\":\"push\",\"channel\":\"main-process-message\",\"args\":[]}\n";
        let mut reader = BufReader::new(&data[..]);
        let parsed: HostMessage = read_message(&mut reader).await.unwrap().unwrap();
        assert!(matches!(parsed, HostMessage::Push { .. }));
    }

    #[tokio::test]
    async fn test_read_invalid_json_is_protocol_error() {
        let data = b"this is not json\n";
        let mut reader = BufReader::new(&data[..]);
        let result: Result<Option<SandboxMessage>, _> = read_message(&mut reader).await;
        assert!(matches!(result, Err(BridgeError::ProtocolError(_))));
    }

    #[tokio::test]
    async fn test_read_two_frames_in_order() {
        let mut buffer = Vec::new();
        for id in ["req-1", "req-2"] {
            let msg = HostMessage::CallResult {
                id: id.to_string(),
                value: serde_json::Value::Null,
            };
            write_message(&mut buffer, &msg).await.unwrap();
        }

        let mut reader = BufReader::new(buffer.as_slice());
        let first: HostMessage = read_message(&mut reader).await.unwrap().unwrap();
        let second: HostMessage = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(first.id(), Some("req-1"));
        assert_eq!(second.id(), Some("req-2"));
    }
}
