//! Error types for the Cachet protocol core.
//!
//! All variants are terminal for the operation that raised them, mutate no
//! state beyond what the operation explicitly specifies, and are never
//! retried internally. The cryptographic variants are deliberately opaque:
//! `InvalidCertificate` and `DecryptionFailure` carry no detail about which
//! byte or field failed, so callers cannot be turned into an oracle.

use thiserror::Error;

/// Errors raised by protocol operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Certificate signature failed to verify; the certificate was not stored
    #[error("certificate validation failed")]
    InvalidCertificate,

    /// Operation referenced a username absent from the trust store
    #[error("unknown peer: {username}")]
    UnknownPeer {
        /// The username that was not found
        username: String,
    },

    /// Message identifier did not advance past the last accepted one
    #[error("replay detected for message {message_id}")]
    ReplayDetected {
        /// The rejected message identifier
        message_id: u64,
    },

    /// AEAD authentication failed during decryption
    #[error("message decryption failed")]
    DecryptionFailure,

    /// Engine was used before `generate_certificate` established an identity
    #[error("engine has no identity: generate a certificate first")]
    NoIdentity,
}

impl ProtocolError {
    /// Returns true if the error indicates possible tampering or replay,
    /// as opposed to a local usage error.
    ///
    /// `UnknownPeer` and `NoIdentity` mean the caller skipped a protocol
    /// step; the other variants mean the input itself cannot be trusted.
    pub fn is_suspect(&self) -> bool {
        matches!(
            self,
            Self::InvalidCertificate | Self::ReplayDetected { .. } | Self::DecryptionFailure
        )
    }
}

impl From<cachet_crypto::CryptoError> for ProtocolError {
    fn from(_: cachet_crypto::CryptoError) -> Self {
        Self::DecryptionFailure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tamper_and_replay_are_suspect() {
        assert!(ProtocolError::InvalidCertificate.is_suspect());
        assert!(ProtocolError::ReplayDetected { message_id: 7 }.is_suspect());
        assert!(ProtocolError::DecryptionFailure.is_suspect());
    }

    #[test]
    fn usage_errors_are_not_suspect() {
        assert!(!ProtocolError::UnknownPeer { username: "mallory".to_string() }.is_suspect());
        assert!(!ProtocolError::NoIdentity.is_suspect());
    }

    #[test]
    fn cryptographic_errors_are_opaque() {
        assert_eq!(ProtocolError::InvalidCertificate.to_string(), "certificate validation failed");
        assert_eq!(ProtocolError::DecryptionFailure.to_string(), "message decryption failed");
    }
}
