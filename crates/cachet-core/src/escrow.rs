//! The escrow encryption path and the escrow authority role
//!
//! Every message carries an escrow record: its session key encrypted so that
//! only the escrow authority can recover it. The path is independent per
//! message — a fresh single-use key pair runs the agreement against the
//! authority's long-lived public key, and the wrapping key is derived with
//! the same fixed context as the message key itself. Compromising one record
//! exposes no other message.

use std::sync::Arc;

use cachet_crypto::{AgreementKeyPair, AgreementPublicKey, NONCE_SIZE, Primitives, SymmetricKey};

use crate::{error::ProtocolError, message::MessageHeader};

/// A session key wrapped for the escrow authority.
///
/// The ephemeral public key lets the authority redo the key agreement; the
/// nonce is the canonical 24-byte array used for the wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowRecord {
    /// Single-use public key for the authority's side of the agreement
    pub ephemeral_public: AgreementPublicKey,
    /// The AEAD-wrapped raw session key bytes
    pub ciphertext: Vec<u8>,
    /// Nonce used for the wrapping
    pub nonce: [u8; NONCE_SIZE],
}

/// Wrap `session_key` for the escrow authority identified by `escrow_public`.
///
/// Generates a fresh single-use agreement key pair, derives the wrapping key
/// from its agreement with the authority's long-lived key, and encrypts the
/// raw session-key bytes under a fresh nonce.
pub fn seal_record(
    session_key: &SymmetricKey,
    escrow_public: &AgreementPublicKey,
    primitives: &dyn Primitives,
) -> EscrowRecord {
    let ephemeral = primitives.generate_agreement_keypair();
    let shared = primitives.diffie_hellman(&ephemeral.secret, escrow_public);
    let wrapping_key = primitives.derive_symmetric_key(&shared);

    let nonce = primitives.random_nonce();
    let ciphertext = primitives.aead_encrypt(&wrapping_key, &nonce, session_key.as_bytes());

    EscrowRecord { ephemeral_public: ephemeral.public, ciphertext, nonce }
}

/// The escrow authority role.
///
/// Holds a long-lived agreement key pair whose public component is
/// distributed to every participant. Only ever decrypts escrow records —
/// never participant-to-participant content directly.
pub struct EscrowAuthority {
    keypair: AgreementKeyPair,
    primitives: Arc<dyn Primitives>,
}

impl EscrowAuthority {
    /// Create an authority with a freshly generated agreement key pair.
    pub fn new(primitives: Arc<dyn Primitives>) -> Self {
        let keypair = primitives.generate_agreement_keypair();
        Self { keypair, primitives }
    }

    /// The public key participants seal escrow records against.
    pub fn public_key(&self) -> AgreementPublicKey {
        self.keypair.public
    }

    /// Recover the session key captured in a message header.
    ///
    /// Redoes the key agreement from the header's ephemeral public key,
    /// derives the wrapping key, and unwraps the session key.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::DecryptionFailure`] if the record does not
    /// authenticate or does not contain exactly one session key.
    pub fn open_record(&self, header: &MessageHeader) -> Result<SymmetricKey, ProtocolError> {
        let shared =
            self.primitives.diffie_hellman(&self.keypair.secret, &header.escrow_public_key);
        let wrapping_key = self.primitives.derive_symmetric_key(&shared);

        let key_bytes = self.primitives.aead_decrypt(
            &wrapping_key,
            &header.escrow_nonce,
            &header.escrow_ciphertext,
        )?;

        let key_bytes: [u8; 32] =
            key_bytes.try_into().map_err(|_| ProtocolError::DecryptionFailure)?;
        Ok(SymmetricKey::from_bytes(key_bytes))
    }
}

impl std::fmt::Debug for EscrowAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscrowAuthority")
            .field("public_key", &self.keypair.public)
            .finish_non_exhaustive()
    }
}
