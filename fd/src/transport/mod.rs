//! Point-to-point messaging between fleet actors
//!
//! The coordinator and units depend only on the [`Transport`] trait: addressed
//! sends that carry the sender's identity, and a receive bounded by a timeout.
//! Delivery is best effort. [`Switchboard`] provides an in-process
//! implementation backed by bounded tokio channels.

mod error;
mod local;

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::AgentId;

pub use error::TransportError;
pub use local::{LocalTransport, Switchboard};

/// A message in flight between two actors
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub sender: AgentId,
    pub recipient: AgentId,
    pub body: String,
}

/// Addressed messaging endpoint owned by a single actor
#[async_trait]
pub trait Transport: Send + Sync {
    /// Address other actors use to reach this endpoint
    fn address(&self) -> &AgentId;

    /// Send a body to `to`, stamped with this endpoint's address
    async fn send(&self, to: &AgentId, body: String) -> Result<(), TransportError>;

    /// Wait for the next inbound envelope
    ///
    /// Must be cancel-safe: dropping the future before it resolves must not
    /// lose a message. Returns `None` once the mailbox is closed.
    async fn recv(&mut self) -> Option<Envelope>;

    /// Reply to the sender of `original`
    async fn reply(&self, original: &Envelope, body: String) -> Result<(), TransportError> {
        self.send(&original.sender, body).await
    }

    /// Wait at most `timeout` for an inbound envelope
    ///
    /// `Ok(None)` means nothing arrived in time.
    async fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Envelope>, TransportError> {
        match tokio::time::timeout(timeout, self.recv()).await {
            Ok(Some(envelope)) => Ok(Some(envelope)),
            Ok(None) => Err(TransportError::Disconnected {
                address: self.address().clone(),
            }),
            Err(_) => Ok(None),
        }
    }
}
