//! Symmetric key derivation using HKDF-SHA256
//!
//! One derivation, one context. Both the peer message path and the escrow
//! wrapping path call [`derive_symmetric_key`] with the same protocol-wide
//! label, matching how the session key must be re-derivable on every side
//! that legitimately holds the shared secret.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::keys::{SharedSecret, SymmetricKey};

/// Fixed protocol-wide derivation context.
///
/// Binding the context into the derivation ensures the derived key is
/// specific to this protocol and the raw DH output is never reusable
/// elsewhere.
pub const KEY_CONTEXT: &[u8] = b"cachet/v1 key derivation";

/// Derive the 32-byte message key from a Diffie-Hellman shared secret.
///
/// Deterministic: the same shared secret always yields the same key, which
/// is what lets the recipient and the escrow authority re-derive it.
pub fn derive_symmetric_key(shared: &SharedSecret) -> SymmetricKey {
    let hkdf = Hkdf::<Sha256>::new(None, shared.as_bytes());

    let mut key = [0u8; 32];
    let Ok(()) = hkdf.expand(KEY_CONTEXT, &mut key) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    SymmetricKey(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;

    #[test]
    fn derivation_is_deterministic() {
        let a = keys::generate_agreement_keypair(&mut rand::rngs::OsRng);
        let b = keys::generate_agreement_keypair(&mut rand::rngs::OsRng);

        let key1 = derive_symmetric_key(&keys::diffie_hellman(&a.secret, &b.public));
        let key2 = derive_symmetric_key(&keys::diffie_hellman(&a.secret, &b.public));

        assert_eq!(key1.as_bytes(), key2.as_bytes(), "same inputs must produce same output");
    }

    #[test]
    fn both_sides_derive_the_same_key() {
        let a = keys::generate_agreement_keypair(&mut rand::rngs::OsRng);
        let b = keys::generate_agreement_keypair(&mut rand::rngs::OsRng);

        let sender = derive_symmetric_key(&keys::diffie_hellman(&a.secret, &b.public));
        let receiver = derive_symmetric_key(&keys::diffie_hellman(&b.secret, &a.public));

        assert_eq!(sender.as_bytes(), receiver.as_bytes());
    }

    #[test]
    fn derived_key_differs_from_raw_secret() {
        let a = keys::generate_agreement_keypair(&mut rand::rngs::OsRng);
        let b = keys::generate_agreement_keypair(&mut rand::rngs::OsRng);

        let shared = keys::diffie_hellman(&a.secret, &b.public);
        let raw = *shared.as_bytes();
        let derived = derive_symmetric_key(&shared);

        assert_ne!(derived.as_bytes(), &raw, "derived key must not equal raw DH output");
    }

    #[test]
    fn different_secrets_derive_different_keys() {
        let a = keys::generate_agreement_keypair(&mut rand::rngs::OsRng);
        let b = keys::generate_agreement_keypair(&mut rand::rngs::OsRng);
        let c = keys::generate_agreement_keypair(&mut rand::rngs::OsRng);

        let ab = derive_symmetric_key(&keys::diffie_hellman(&a.secret, &b.public));
        let ac = derive_symmetric_key(&keys::diffie_hellman(&a.secret, &c.public));

        assert_ne!(ab.as_bytes(), ac.as_bytes());
    }
}
