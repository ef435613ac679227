//! Trait abstraction for message transport to enable testing

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::message::JoyMessage;
use crate::error::{Result, VirtualJoyError};

/// Transport for outbound joy messages
#[async_trait]
pub trait JoySink: Send {
    /// Deliver one message on the given topic
    async fn send(&mut self, topic: &str, msg: &JoyMessage) -> Result<()>;
}

#[derive(Serialize)]
struct Envelope<'a> {
    topic: &'a str,
    msg: &'a JoyMessage,
}

/// Writes each message as one JSON line: `{"topic": ..., "msg": {...}}`
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> JoySink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, topic: &str, msg: &JoyMessage) -> Result<()> {
        let mut line = serde_json::to_vec(&Envelope { topic, msg })
            .map_err(|e| VirtualJoyError::Publish(format!("Failed to encode message: {}", e)))?;
        line.push(b'\n');

        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
