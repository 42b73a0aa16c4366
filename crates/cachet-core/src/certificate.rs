//! Certificates and the per-engine trust store
//!
//! A certificate is an unsigned binding of a username to its public
//! agreement key. Signatures cover the canonical CBOR serialization of the
//! certificate, so both the CA and every verifier reproduce the exact same
//! byte string from the same fields.

use std::collections::HashMap;

use cachet_crypto::{AgreementPublicKey, Signature};
use serde::{Deserialize, Serialize};

/// An unsigned binding of a username to its public key-agreement material.
///
/// Immutable once created. Only trusted when paired with a
/// [`CertificateSignature`] that verifies against the CA's public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// The identity this certificate binds
    pub username: String,
    /// The identity's public X25519 agreement key
    pub public_key: AgreementPublicKey,
}

impl Certificate {
    /// Canonical serialization: the byte string signatures cover.
    ///
    /// CBOR with the declared field order. Verifiers recompute this from a
    /// received certificate's fields, so any mutation of either field
    /// changes the signed bytes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(64);
        let Ok(()) = ciborium::ser::into_writer(self, &mut bytes) else {
            unreachable!("certificate serialization into a Vec cannot fail");
        };
        bytes
    }
}

/// A detached CA signature over a certificate's canonical serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateSignature(pub Signature);

/// Per-engine store of verified peer certificates.
///
/// Entries are inserted only after successful signature verification and are
/// never removed (there is no revocation). Re-certification silently
/// replaces the prior entry for a username. Plain struct; the owning engine
/// provides locking.
#[derive(Debug, Default)]
pub struct TrustStore {
    certificates: HashMap<String, Certificate>,
}

impl TrustStore {
    /// Create an empty trust store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a verified certificate, keyed by its username.
    ///
    /// Returns the replaced certificate if the username was already trusted.
    pub fn insert(&mut self, certificate: Certificate) -> Option<Certificate> {
        self.certificates.insert(certificate.username.clone(), certificate)
    }

    /// Certificate for a username. `None` if the peer is untrusted.
    pub fn get(&self, username: &str) -> Option<&Certificate> {
        self.certificates.get(username)
    }

    /// Check whether a username has a verified certificate.
    pub fn contains(&self, username: &str) -> bool {
        self.certificates.contains_key(username)
    }

    /// Number of trusted peers.
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// True if no peer has been verified yet.
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}
