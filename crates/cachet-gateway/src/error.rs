//! Error types for the gateway layer

use cachet_core::ProtocolError;
use thiserror::Error;

/// Errors from mailbox operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailboxError {
    /// No mailbox has been provisioned for the recipient
    #[error("no mailbox for recipient: {recipient}")]
    UnknownRecipient {
        /// The recipient without a mailbox
        recipient: String,
    },
}

/// Errors from gateway operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Operation referenced a username with no registered engine
    #[error("client not found: {username}")]
    ClientNotFound {
        /// The unregistered username
        username: String,
    },

    /// Registration attempted for a username that already has an engine
    #[error("client already exists: {username}")]
    ClientExists {
        /// The username already registered
        username: String,
    },

    /// Receive was asked to deliver from the mailbox, but nothing is queued
    #[error("no pending message from {sender} for {recipient}")]
    EmptyMailbox {
        /// The sender whose queue was empty
        sender: String,
        /// The recipient who asked
        recipient: String,
    },

    /// A protocol operation failed
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A mailbox operation failed
    #[error(transparent)]
    Mailbox(#[from] MailboxError),
}
