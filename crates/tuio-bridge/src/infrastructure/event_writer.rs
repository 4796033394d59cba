//! JSON-lines output of touch events.

use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::domain::messages::TouchEventJson;

/// Writes each event as one line of JSON and flushes.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_events<W>(out: &mut W, events: &[TouchEventJson]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    for event in events {
        serde_json::to_writer(&mut buf, event).context("failed to serialize touch event")?;
        buf.push(b'\n');
    }
    out.write_all(&buf).await.context("failed to write touch events")?;
    out.flush().await.context("failed to flush touch events")?;
    Ok(())
}
