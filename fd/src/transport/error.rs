//! Transport error types

use thiserror::Error;

use crate::domain::AgentId;

/// Errors from addressed message delivery
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("No mailbox registered for {address}")]
    UnknownAddress { address: AgentId },

    #[error("Address {address} is already registered")]
    AddressInUse { address: AgentId },

    #[error("Mailbox of {address} is full, message dropped")]
    MailboxFull { address: AgentId },

    #[error("Mailbox of {address} is closed")]
    Disconnected { address: AgentId },
}
