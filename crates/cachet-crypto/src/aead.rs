//! Authenticated encryption using XChaCha20-Poly1305
//!
//! One canonical nonce representation: a 24-byte binary array, generated
//! fresh per encryption and carried verbatim in the message header. There is
//! no alternate encoding and no fallback decoding path.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use rand::{CryptoRng, RngCore};

use crate::{error::CryptoError, keys::SymmetricKey};

/// XChaCha20 nonce size (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Generate a fresh random 24-byte nonce.
///
/// Nonces must never repeat under the same key; a 24-byte random nonce makes
/// collision negligible without any per-key counter state.
pub fn random_nonce<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt `plaintext` under `key` and `nonce`.
///
/// Returns ciphertext with the 16-byte Poly1305 tag appended.
pub fn encrypt(key: &SymmetricKey, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Vec<u8> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let Ok(ciphertext) = cipher.encrypt(XNonce::from_slice(nonce), plaintext) else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    ciphertext
}

/// Decrypt `ciphertext` under `key` and `nonce`.
///
/// # Errors
///
/// [`CryptoError::AeadFailure`] on any authentication failure. Wrong key,
/// wrong nonce, and tampered ciphertext are indistinguishable by design.
pub fn decrypt(
    key: &SymmetricKey,
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher.decrypt(XNonce::from_slice(nonce), ciphertext).map_err(|_| CryptoError::AeadFailure)
}
