//! The injectable primitives interface
//!
//! The protocol roles (participant engine, CA, escrow authority) never reach
//! for crypto as an ambient capability; they hold a [`Primitives`] handle.
//! Randomized operations are required methods so test doubles can pin them;
//! deterministic operations default to the pure module functions.

use crate::{
    aead::{self, NONCE_SIZE},
    derive,
    error::CryptoError,
    keys::{self, AgreementKeyPair, AgreementPublicKey, AgreementSecretKey, SharedSecret, SymmetricKey},
    sign::{self, Signature, SigningKeyPair, SigningPublicKey, SigningSecretKey},
};

/// Cryptographic primitive contracts required by the protocol roles.
pub trait Primitives: Send + Sync {
    /// Generate a fresh X25519 agreement key pair.
    fn generate_agreement_keypair(&self) -> AgreementKeyPair;

    /// Generate a fresh Ed25519 signing key pair.
    fn generate_signing_keypair(&self) -> SigningKeyPair;

    /// Generate a fresh 24-byte AEAD nonce.
    fn random_nonce(&self) -> [u8; NONCE_SIZE];

    /// Compute the X25519 shared secret.
    fn diffie_hellman(
        &self,
        secret: &AgreementSecretKey,
        public: &AgreementPublicKey,
    ) -> SharedSecret {
        keys::diffie_hellman(secret, public)
    }

    /// Derive the fixed-context symmetric key from a shared secret.
    fn derive_symmetric_key(&self, shared: &SharedSecret) -> SymmetricKey {
        derive::derive_symmetric_key(shared)
    }

    /// AEAD-encrypt `plaintext`; returns ciphertext with appended tag.
    fn aead_encrypt(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> Vec<u8> {
        aead::encrypt(key, nonce, plaintext)
    }

    /// AEAD-decrypt `ciphertext`; opaque failure on bad authentication.
    fn aead_decrypt(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        aead::decrypt(key, nonce, ciphertext)
    }

    /// Sign `message` with an Ed25519 secret key.
    fn sign(&self, secret: &SigningSecretKey, message: &[u8]) -> Signature {
        sign::sign(secret, message)
    }

    /// Verify an Ed25519 signature.
    fn verify(&self, public: &SigningPublicKey, message: &[u8], signature: &Signature) -> bool {
        sign::verify(public, message, signature)
    }
}

/// Production primitives backed by the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsPrimitives;

impl Primitives for OsPrimitives {
    fn generate_agreement_keypair(&self) -> AgreementKeyPair {
        keys::generate_agreement_keypair(&mut rand::rngs::OsRng)
    }

    fn generate_signing_keypair(&self) -> SigningKeyPair {
        sign::generate_signing_keypair(&mut rand::rngs::OsRng)
    }

    fn random_nonce(&self) -> [u8; NONCE_SIZE] {
        aead::random_nonce(&mut rand::rngs::OsRng)
    }
}
