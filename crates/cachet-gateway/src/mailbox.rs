//! Per-recipient mailbox of undelivered envelopes
//!
//! Trait-based abstraction so a transport can persist queues however it
//! likes; the envelope field set is fixed, the encoding is not, as long as a
//! round trip preserves key material byte-exactly. Implementations must be
//! `Clone + Send + Sync` and synchronous; clones share the same underlying
//! queues.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use cachet_core::{Ciphertext, MessageHeader};
use serde::{Deserialize, Serialize};

use crate::error::MailboxError;

/// One undelivered message: who sent it, and everything needed to decrypt it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Username of the sending participant
    pub sender: String,
    /// Transport metadata for the ciphertext
    pub header: MessageHeader,
    /// The encrypted message body
    pub ciphertext: Ciphertext,
}

/// Queue of undelivered envelopes per recipient, FIFO per sender.
pub trait Mailbox: Clone + Send + Sync + 'static {
    /// Create an empty mailbox for `recipient`.
    ///
    /// Idempotent: provisioning an existing mailbox keeps its queues.
    fn provision(&self, recipient: &str) -> Result<(), MailboxError>;

    /// Queue an envelope for `recipient`.
    ///
    /// # Errors
    ///
    /// [`MailboxError::UnknownRecipient`] if no mailbox was provisioned.
    fn push(&self, recipient: &str, envelope: Envelope) -> Result<(), MailboxError>;

    /// The newest queued envelope from `sender`, without removing it.
    fn latest(&self, recipient: &str, sender: &str) -> Result<Option<Envelope>, MailboxError>;

    /// Remove and return all queued envelopes from `sender`, oldest first.
    fn drain(&self, recipient: &str, sender: &str) -> Result<Vec<Envelope>, MailboxError>;
}

type Queues = HashMap<String, HashMap<String, Vec<Envelope>>>;

/// In-memory mailbox. Clones share the same queues.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailbox {
    queues: Arc<Mutex<Queues>>,
}

impl MemoryMailbox {
    /// Create an empty in-memory mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_queues<T>(&self, f: impl FnOnce(&mut Queues) -> T) -> T {
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut queues)
    }
}

impl Mailbox for MemoryMailbox {
    fn provision(&self, recipient: &str) -> Result<(), MailboxError> {
        self.with_queues(|queues| {
            queues.entry(recipient.to_string()).or_default();
        });
        Ok(())
    }

    fn push(&self, recipient: &str, envelope: Envelope) -> Result<(), MailboxError> {
        self.with_queues(|queues| {
            let per_sender = queues.get_mut(recipient).ok_or_else(|| {
                MailboxError::UnknownRecipient { recipient: recipient.to_string() }
            })?;
            per_sender.entry(envelope.sender.clone()).or_default().push(envelope);
            Ok(())
        })
    }

    fn latest(&self, recipient: &str, sender: &str) -> Result<Option<Envelope>, MailboxError> {
        self.with_queues(|queues| {
            let per_sender = queues.get(recipient).ok_or_else(|| {
                MailboxError::UnknownRecipient { recipient: recipient.to_string() }
            })?;
            Ok(per_sender.get(sender).and_then(|queue| queue.last().cloned()))
        })
    }

    fn drain(&self, recipient: &str, sender: &str) -> Result<Vec<Envelope>, MailboxError> {
        self.with_queues(|queues| {
            let per_sender = queues.get_mut(recipient).ok_or_else(|| {
                MailboxError::UnknownRecipient { recipient: recipient.to_string() }
            })?;
            Ok(per_sender.remove(sender).unwrap_or_default())
        })
    }
}
