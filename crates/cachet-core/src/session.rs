//! Per-peer session state and replay protection
//!
//! A session records the highest message identifier accepted from a peer.
//! Sessions are created lazily on the first accepted message and live as
//! long as the engine. The replay check and the state update happen under
//! one lock: two interleaved deliveries carrying the same identifier cannot
//! both pass.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use crate::error::ProtocolError;

/// Replay-protection state for every peer of one engine.
///
/// The identifier is recorded *before* decryption is attempted, per the
/// receive contract: a concurrent duplicate must lose the race here, not at
/// the AEAD layer.
#[derive(Debug, Default)]
pub struct SessionTable {
    last_accepted: Mutex<HashMap<String, u64>>,
}

impl SessionTable {
    /// Create a table with no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the replay check for `message_id` from `peer` and, on success,
    /// record it as the last accepted identifier in the same critical
    /// section.
    ///
    /// Identifiers must strictly increase per peer: an identifier equal to
    /// or below the last accepted one fails with
    /// [`ProtocolError::ReplayDetected`].
    pub fn accept(&self, peer: &str, message_id: u64) -> Result<(), ProtocolError> {
        let mut sessions = self.last_accepted.lock().unwrap_or_else(PoisonError::into_inner);

        match sessions.get(peer) {
            Some(&last) if message_id <= last => {
                Err(ProtocolError::ReplayDetected { message_id })
            },
            _ => {
                sessions.insert(peer.to_string(), message_id);
                Ok(())
            },
        }
    }

    /// Last accepted identifier for a peer. `None` before the first message.
    pub fn last_accepted(&self, peer: &str) -> Option<u64> {
        self.last_accepted.lock().unwrap_or_else(PoisonError::into_inner).get(peer).copied()
    }
}
