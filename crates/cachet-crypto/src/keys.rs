//! X25519 key agreement and key material types
//!
//! Key material lives in plain byte newtypes so certificates and headers can
//! carry public keys byte-exactly. Secret-bearing types zeroize on drop and
//! never expose their bytes through `Debug`.

use rand::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::Zeroize;

/// Public half of an X25519 agreement key pair (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AgreementPublicKey([u8; 32]);

impl AgreementPublicKey {
    /// Construct from raw bytes (e.g. a deserialized certificate).
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Secret half of an X25519 agreement key pair.
///
/// Never serialized; never leaves the component that generated it.
pub struct AgreementSecretKey([u8; 32]);

impl AgreementSecretKey {
    pub(crate) fn bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl Drop for AgreementSecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for AgreementSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AgreementSecretKey(..)")
    }
}

/// An X25519 key pair.
#[derive(Debug)]
pub struct AgreementKeyPair {
    /// Public half, safe to publish in a certificate.
    pub public: AgreementPublicKey,
    /// Secret half, held by the owning component only.
    pub secret: AgreementSecretKey,
}

/// Raw 32-byte Diffie-Hellman output.
///
/// Only ever an input to [`crate::derive::derive_symmetric_key`]; the raw
/// DH output is never used as an encryption key directly.
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Raw shared-secret bytes (input keying material for derivation).
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

/// A derived 32-byte symmetric key for XChaCha20-Poly1305.
pub struct SymmetricKey(pub(crate) [u8; 32]);

impl SymmetricKey {
    /// Construct from raw bytes (e.g. a session key recovered from escrow).
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes (exported into an escrow record).
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// Generate a fresh X25519 key pair from the given RNG.
pub fn generate_agreement_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> AgreementKeyPair {
    let secret = StaticSecret::random_from_rng(&mut *rng);
    let public = X25519Public::from(&secret);
    AgreementKeyPair {
        public: AgreementPublicKey(public.to_bytes()),
        secret: AgreementSecretKey(secret.to_bytes()),
    }
}

/// Compute the X25519 shared secret between a secret key and a public key.
///
/// Commutative: `dh(a.secret, b.public) == dh(b.secret, a.public)`.
pub fn diffie_hellman(secret: &AgreementSecretKey, public: &AgreementPublicKey) -> SharedSecret {
    let secret = StaticSecret::from(secret.bytes());
    let public = X25519Public::from(*public.as_bytes());
    SharedSecret(*secret.diffie_hellman(&public).as_bytes())
}
