//! # Publisher Module
//!
//! Packages the stick value into joy messages and hands them to a transport.
//!
//! This module handles:
//! - Building timestamped messages with a running sequence number
//! - Reordering stick axes into robot convention
//! - Collecting button states from host-supplied providers
//! - Driving publication from a start/stop timer
//!
//! Transport failures never propagate: they are logged and counted.

pub mod buttons;
pub mod message;
pub mod sink;
pub mod timer;

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::{Result, VirtualJoyError};
use message::{Header, JoyAxes, JoyMessage, Stamp};
use sink::JoySink;

/// Default channel name.
pub const DEFAULT_TOPIC: &str = "/joy";

/// Publishing handle for one channel.
pub struct JoyPublisher {
    topic: String,
    frame_id: String,
    sink: Option<Box<dyn JoySink>>,
    seq: u32,
    sent: u64,
    failed: u64,
}

impl fmt::Debug for JoyPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoyPublisher")
            .field("topic", &self.topic)
            .field("frame_id", &self.frame_id)
            .field("attached", &self.sink.is_some())
            .field("seq", &self.seq)
            .field("sent", &self.sent)
            .field("failed", &self.failed)
            .finish()
    }
}

impl JoyPublisher {
    /// Creates a publisher with no transport attached.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            frame_id: String::new(),
            sink: None,
            seq: 0,
            sent: 0,
            failed: 0,
        }
    }

    #[must_use]
    pub fn with_frame_id(mut self, frame_id: impl Into<String>) -> Self {
        self.frame_id = frame_id.into();
        self
    }

    /// Attaches a transport, replacing any previous one.
    pub fn attach(&mut self, sink: Box<dyn JoySink>) {
        self.sink = Some(sink);
        info!("Publisher attached on {}", self.topic);
    }

    /// Detaches the transport. Later publishes fail until one is attached.
    pub fn detach(&mut self) -> Option<Box<dyn JoySink>> {
        self.sink.take()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Moves publication to another channel.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualJoyError::Config`] if the name is empty or contains
    /// whitespace; the current topic is kept.
    pub fn set_topic(&mut self, topic: &str) -> Result<()> {
        validate_topic(topic)?;

        if topic != self.topic {
            info!("Publisher topic changed: {} -> {}", self.topic, topic);
            self.topic = topic.to_string();
        }
        Ok(())
    }

    /// Number of messages delivered.
    #[must_use]
    pub fn sent_count(&self) -> u64 {
        self.sent
    }

    /// Number of publish attempts that failed.
    #[must_use]
    pub fn failed_count(&self) -> u64 {
        self.failed
    }

    /// Builds the next message. Advances the sequence number.
    pub fn build_message(&mut self, value: (f64, f64), buttons: &[bool]) -> JoyMessage {
        let header = Header {
            seq: self.seq,
            stamp: Stamp::now(),
            frame_id: self.frame_id.clone(),
        };
        self.seq = self.seq.wrapping_add(1);

        JoyMessage::new(header, JoyAxes::from_model(value), buttons)
    }

    /// Publishes one message, returning transport errors to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualJoyError::Publish`] when no transport is attached,
    /// or whatever error the transport reports.
    pub async fn try_publish(&mut self, value: (f64, f64), buttons: &[bool]) -> Result<()> {
        if self.sink.is_none() {
            return Err(VirtualJoyError::Publish("publisher not initialized".to_string()));
        }

        let msg = self.build_message(value, buttons);
        if let Some(sink) = self.sink.as_mut() {
            sink.send(&self.topic, &msg).await?;
        }

        debug!("Published seq {} on {}", msg.header.seq, self.topic);
        Ok(())
    }

    /// Publishes one message. Failures are logged and swallowed.
    ///
    /// Returns whether the message was delivered.
    pub async fn publish(&mut self, value: (f64, f64), buttons: &[bool]) -> bool {
        match self.try_publish(value, buttons).await {
            Ok(()) => {
                self.sent += 1;
                true
            }
            Err(e) => {
                self.failed += 1;
                warn!("Failed to publish on {}: {}", self.topic, e);
                false
            }
        }
    }
}

/// Checks a channel name.
pub(crate) fn validate_topic(topic: &str) -> Result<()> {
    if topic.is_empty() {
        return Err(VirtualJoyError::Config("topic cannot be empty".to_string()));
    }
    if topic.chars().any(char::is_whitespace) {
        return Err(VirtualJoyError::Config(format!(
            "topic '{}' must not contain whitespace",
            topic
        )));
    }
    Ok(())
}
