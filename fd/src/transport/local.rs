//! In-process transport backed by tokio mpsc mailboxes

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::{Envelope, Transport, TransportError};
use crate::domain::AgentId;

/// Address book mapping each registered actor to its mailbox
///
/// Cloning is cheap; all clones share the same address book.
#[derive(Clone, Default)]
pub struct Switchboard {
    mailboxes: Arc<RwLock<HashMap<AgentId, mpsc::Sender<Envelope>>>>,
}

impl Switchboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mailbox for `address` and return its endpoint
    pub fn register(&self, address: impl Into<AgentId>, buffer: usize) -> Result<LocalTransport, TransportError> {
        let address = address.into();
        debug!(%address, buffer, "Switchboard::register: called");

        let mut mailboxes = self.mailboxes.write().unwrap_or_else(|e| e.into_inner());
        if mailboxes.contains_key(&address) {
            return Err(TransportError::AddressInUse { address });
        }

        let (tx, rx) = mpsc::channel(buffer.max(1));
        mailboxes.insert(address.clone(), tx);

        Ok(LocalTransport {
            address,
            mailbox: rx,
            switchboard: self.clone(),
        })
    }

    /// Remove `address` from the address book
    ///
    /// Messages already queued stay readable by the endpoint.
    pub fn deregister(&self, address: &AgentId) {
        debug!(%address, "Switchboard::deregister: called");
        self.mailboxes.write().unwrap_or_else(|e| e.into_inner()).remove(address);
    }

    /// Registered addresses, sorted
    pub fn addresses(&self) -> Vec<AgentId> {
        let mut addresses: Vec<AgentId> = self
            .mailboxes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        addresses.sort();
        addresses
    }

    fn deliver(&self, envelope: Envelope) -> Result<(), TransportError> {
        let tx = self
            .mailboxes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&envelope.recipient)
            .cloned()
            .ok_or_else(|| TransportError::UnknownAddress {
                address: envelope.recipient.clone(),
            })?;

        let recipient = envelope.recipient.clone();
        tx.try_send(envelope).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TransportError::MailboxFull { address: recipient },
            mpsc::error::TrySendError::Closed(_) => TransportError::Disconnected { address: recipient },
        })
    }
}

/// One actor's endpoint on a [`Switchboard`]
pub struct LocalTransport {
    address: AgentId,
    mailbox: mpsc::Receiver<Envelope>,
    switchboard: Switchboard,
}

#[async_trait]
impl Transport for LocalTransport {
    fn address(&self) -> &AgentId {
        &self.address
    }

    async fn send(&self, to: &AgentId, body: String) -> Result<(), TransportError> {
        self.switchboard.deliver(Envelope {
            sender: self.address.clone(),
            recipient: to.clone(),
            body,
        })
    }

    async fn recv(&mut self) -> Option<Envelope> {
        self.mailbox.recv().await
    }
}

impl Drop for LocalTransport {
    fn drop(&mut self) {
        self.switchboard.deregister(&self.address);
    }
}
