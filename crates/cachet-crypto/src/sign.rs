//! Ed25519 signatures for certificate authentication

use ed25519_dalek::{Signer, Verifier};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Public half of an Ed25519 signing key pair (32 bytes).
///
/// The CA's public key is the trust anchor distributed out-of-band to every
/// participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SigningPublicKey([u8; 32]);

impl SigningPublicKey {
    /// Construct from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Secret half of an Ed25519 signing key pair.
pub struct SigningSecretKey([u8; 32]);

impl Drop for SigningSecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SigningSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecretKey(..)")
    }
}

/// An Ed25519 key pair.
#[derive(Debug)]
pub struct SigningKeyPair {
    /// Public half, the verification anchor.
    pub public: SigningPublicKey,
    /// Secret half, held by the signing role only.
    pub secret: SigningSecretKey,
}

/// A detached 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Construct from raw bytes (e.g. received over the wire).
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({} bytes)", self.0.len())
    }
}

/// Generate a fresh Ed25519 key pair from the given RNG.
pub fn generate_signing_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> SigningKeyPair {
    let signing = ed25519_dalek::SigningKey::generate(rng);
    SigningKeyPair {
        public: SigningPublicKey(signing.verifying_key().to_bytes()),
        secret: SigningSecretKey(signing.to_bytes()),
    }
}

/// Sign `message` with the given secret key.
pub fn sign(secret: &SigningSecretKey, message: &[u8]) -> Signature {
    let signing = ed25519_dalek::SigningKey::from_bytes(&secret.0);
    Signature(signing.sign(message).to_bytes())
}

/// Verify `signature` over `message` against `public`.
///
/// A malformed public key verifies nothing: the result is `false`, not an
/// error, so callers have a single rejection path.
pub fn verify(public: &SigningPublicKey, message: &[u8], signature: &Signature) -> bool {
    let Ok(verifying) = ed25519_dalek::VerifyingKey::from_bytes(&public.0) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying.verify(message, &signature).is_ok()
}
