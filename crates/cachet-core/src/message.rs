//! Wire shapes and the per-engine message identifier clock

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use cachet_crypto::{AgreementPublicKey, NONCE_SIZE};
use serde::{Deserialize, Serialize};

/// Transport metadata accompanying a ciphertext.
///
/// Carries everything the receiver needs to re-derive the shared key and
/// everything the escrow authority needs to recover the session key. Carries
/// no plaintext. Nonces are canonical 24-byte binary arrays; there is no
/// alternate encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    /// Single-use public key the escrow authority runs its key agreement
    /// against
    pub escrow_public_key: AgreementPublicKey,
    /// The message's session key, AEAD-wrapped for the escrow authority
    pub escrow_ciphertext: Vec<u8>,
    /// Nonce for the escrow wrapping
    pub escrow_nonce: [u8; NONCE_SIZE],
    /// Nonce for the message body
    pub message_nonce: [u8; NONCE_SIZE],
    /// Strictly increasing per-sender message identifier
    pub message_id: u64,
}

/// AEAD output for a message body: encrypted payload plus authentication tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// Wrap raw AEAD output.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The authenticated bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Strictly increasing, timestamp-seeded message identifier source.
///
/// Identifiers start at the current wall-clock milliseconds and never repeat
/// or decrease within an engine instance, even when the wall clock stalls or
/// steps backwards: each draw is `max(last + 1, now)`.
#[derive(Debug, Default)]
pub struct MessageIdClock {
    last: AtomicU64,
}

impl MessageIdClock {
    /// Create a clock with no identifiers drawn yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the next message identifier.
    pub fn next(&self) -> u64 {
        let now = unix_millis();
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(last.max(now - 1) + 1));
        match prev {
            Ok(last) => last.max(now - 1) + 1,
            Err(_) => unreachable!("fetch_update closure always returns Some"),
        }
    }
}

fn unix_millis() -> u64 {
    // Pre-epoch clocks collapse to 1 so `now - 1` cannot underflow
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |elapsed| (elapsed.as_millis() as u64).max(1))
}
