//! Line-delimited JSON transport between the host and the plugin.
//!
//! Each input line is a frame `{"type": <kind>, "data": <payload>}`; each
//! output line is the [`Envelope`] for that frame. Object and array payloads
//! are handed to the dispatcher as their JSON text, string payloads as their
//! raw contents, and a missing or `null` payload as empty input.

use serde::Deserialize;
use serde_json::Value;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::dispatch::Envelope;
use crate::service::PluginService;

/// Error text for a line that is not a frame.
pub const INVALID_FRAME: &str = "invalid message frame";

#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: u32,
    #[serde(default)]
    data: Value,
}

impl Frame {
    fn payload(&self) -> Vec<u8> {
        match &self.data {
            Value::Null => Vec::new(),
            Value::String(text) => text.as_bytes().to_vec(),
            other => other.to_string().into_bytes(),
        }
    }
}

/// Serves frames from `reader` until end of input, writing one envelope per
/// frame to `writer`.
///
/// Blank lines are ignored and malformed lines answered with
/// [`INVALID_FRAME`]; neither ends the loop.
///
/// # Errors
///
/// Returns an I/O error when reading or writing fails.
pub async fn serve<R, W>(service: &PluginService, reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let envelope = match serde_json::from_str::<Frame>(trimmed) {
            Ok(frame) => {
                debug!(kind = frame.kind, "received frame");
                service.handle(frame.kind, &frame.payload()).await
            }
            Err(error) => {
                warn!(%error, "ignoring malformed frame");
                Envelope::failure_message(INVALID_FRAME)
            }
        };

        let mut encoded = serde_json::to_vec(&envelope).map_err(io::Error::other)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }

    debug!("input closed");
    Ok(())
}
