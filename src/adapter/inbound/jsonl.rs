//! JSON-lines request loop.
//!
//! One request object per input line, one reply object per output line, in
//! order. Blank lines are skipped; unparseable lines get a validation reply.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::port::inbound::api::{ErrorReply, Reply, Request, RequestHandler};

/// Counters reported when the input closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub requests: usize,
    pub failures: usize,
}

pub struct JsonLinesServer {
    handler: Arc<dyn RequestHandler>,
}

impl JsonLinesServer {
    #[must_use]
    pub fn new(handler: Arc<dyn RequestHandler>) -> Self {
        Self { handler }
    }

    /// Serve until `reader` reaches end of input.
    ///
    /// # Errors
    /// Returns an error only if reading input or writing a reply fails.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<ServeStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut stats = ServeStats::default();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            stats.requests += 1;

            let reply = self.reply_to(line).await;
            if !reply.is_ok() {
                stats.failures += 1;
            }

            let mut out = serde_json::to_vec(&reply)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }

        info!(requests = stats.requests, failures = stats.failures, "Input closed");
        Ok(stats)
    }

    async fn reply_to(&self, line: &str) -> Reply {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handler.handle(request).await,
            Err(e) => {
                debug!(error = %e, "Malformed request line");
                Reply::Err(ErrorReply::from_error(&Error::Json(e)))
            }
        }
    }
}
