//! Error type for primitive operations

use thiserror::Error;

/// Errors from cryptographic primitive operations.
///
/// Deliberately coarse: an AEAD failure does not distinguish a wrong key
/// from a tampered ciphertext or a wrong nonce, and carries no detail about
/// which byte failed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// AEAD authentication failed during decryption
    #[error("aead authentication failed")]
    AeadFailure,
}
