//! The certificate authority role
//!
//! Holds a long-lived Ed25519 signing key pair created once at construction
//! and never rotated. Its public key is the trust anchor distributed
//! out-of-band to every participant engine.

use std::sync::Arc;

use cachet_crypto::{Primitives, SigningKeyPair, SigningPublicKey};

use crate::certificate::{Certificate, CertificateSignature};

/// Signs certificates submitted by the registrar.
pub struct CertificateAuthority {
    keypair: SigningKeyPair,
    primitives: Arc<dyn Primitives>,
}

impl CertificateAuthority {
    /// Create an authority with a freshly generated signing key pair.
    pub fn new(primitives: Arc<dyn Primitives>) -> Self {
        let keypair = primitives.generate_signing_keypair();
        Self { keypair, primitives }
    }

    /// Sign a certificate's canonical serialization.
    ///
    /// Stateless per call; assumes the certificate was produced by a
    /// legitimate engine (the registrar routes, the CA signs).
    pub fn sign(&self, certificate: &Certificate) -> CertificateSignature {
        CertificateSignature(
            self.primitives.sign(&self.keypair.secret, &certificate.canonical_bytes()),
        )
    }

    /// The trust anchor participants verify certificates against.
    pub fn verifying_key(&self) -> SigningPublicKey {
        self.keypair.public
    }
}

impl std::fmt::Debug for CertificateAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateAuthority")
            .field("verifying_key", &self.keypair.public)
            .finish_non_exhaustive()
    }
}
