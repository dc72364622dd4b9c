//! Sends report text to the user.
//!
//! The destination is abstracted as a `Sink` so that the same commands can write to the terminal,
//! a chat, or an in-memory buffer in tests. Chat messages have a size limit, so `deliver` swaps
//! overly long reports for a short notice.

use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// The default maximum message length, in bytes.
pub const DEFAULT_MESSAGE_LIMIT: usize = 4000;

/// Sent instead of a report that is too long for a single message.
pub const TOO_LONG_NOTICE: &str = "Report is too long to send as a message.";

/// Somewhere report text can be sent.
#[async_trait::async_trait]
pub trait Sink {
    /// Send one message.
    async fn send(&mut self, text: &str) -> Result<()>;
}

/// What was actually sent by `deliver`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// The full text was sent.
    Sent,
    /// The text was at or over the limit and `TOO_LONG_NOTICE` was sent instead.
    TooLong,
}

serde_plain::derive_display_from_serialize!(Delivery);
serde_plain::derive_fromstr_from_deserialize!(Delivery);

/// Sends `text` to `sink` if it is shorter than `limit` bytes, otherwise sends `TOO_LONG_NOTICE`.
pub async fn deliver(sink: &mut (dyn Sink + Send), text: &str, limit: usize) -> Result<Delivery> {
    if text.len() < limit {
        debug!("Sending a message of {} bytes", text.len());
        sink.send(text).await?;
        Ok(Delivery::Sent)
    } else {
        warn!(
            "The message is {} bytes, the limit is {limit}; sending a notice instead",
            text.len()
        );
        sink.send(TOO_LONG_NOTICE).await?;
        Ok(Delivery::TooLong)
    }
}

/// Writes each message to stdout followed by a newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

#[async_trait::async_trait]
impl Sink for StdoutSink {
    async fn send(&mut self, text: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{text}\n").as_bytes())
            .await
            .context("Unable to write to stdout")?;
        stdout.flush().await.context("Unable to flush stdout")
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct MemorySink {
    messages: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

#[async_trait::async_trait]
impl Sink for MemorySink {
    async fn send(&mut self, text: &str) -> Result<()> {
        self.messages.push(text.to_string());
        Ok(())
    }
}
