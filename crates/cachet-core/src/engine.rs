//! The participant protocol engine
//!
//! One engine per user identity. The engine owns the identity's agreement
//! key pair, the trust store of verified peer certificates, and per-peer
//! replay state. State lives behind interior mutability so an engine can be
//! shared across delivery threads; AEAD work always happens outside the
//! locks.

use std::sync::{Arc, PoisonError, RwLock};

use cachet_crypto::{AgreementKeyPair, AgreementPublicKey, Primitives, SigningPublicKey};

use crate::{
    certificate::{Certificate, CertificateSignature, TrustStore},
    error::ProtocolError,
    escrow,
    message::{Ciphertext, MessageHeader, MessageIdClock},
    session::SessionTable,
};

struct Identity {
    username: String,
    keypair: AgreementKeyPair,
}

/// The protocol engine for a single user identity.
pub struct ParticipantEngine {
    ca_public_key: SigningPublicKey,
    escrow_public_key: AgreementPublicKey,
    primitives: Arc<dyn Primitives>,
    identity: RwLock<Option<Identity>>,
    trust_store: RwLock<TrustStore>,
    sessions: SessionTable,
    clock: MessageIdClock,
}

impl ParticipantEngine {
    /// Create an engine that trusts certificates signed by `ca_public_key`
    /// and escrows session keys to `escrow_public_key`.
    ///
    /// The engine has no identity until [`Self::generate_certificate`] runs.
    pub fn new(
        ca_public_key: SigningPublicKey,
        escrow_public_key: AgreementPublicKey,
        primitives: Arc<dyn Primitives>,
    ) -> Self {
        Self {
            ca_public_key,
            escrow_public_key,
            primitives,
            identity: RwLock::new(None),
            trust_store: RwLock::new(TrustStore::new()),
            sessions: SessionTable::new(),
            clock: MessageIdClock::new(),
        }
    }

    /// Generate a certificate binding `username` to a fresh agreement key
    /// pair.
    ///
    /// The private half stays inside the engine. Calling this again replaces
    /// the stored key pair: messages negotiated under the old pair become
    /// undecryptable, which is the caller's responsibility to avoid.
    pub fn generate_certificate(&self, username: &str) -> Certificate {
        let keypair = self.primitives.generate_agreement_keypair();
        let certificate =
            Certificate { username: username.to_string(), public_key: keypair.public };

        let mut identity = self.identity.write().unwrap_or_else(PoisonError::into_inner);
        *identity = Some(Identity { username: username.to_string(), keypair });

        certificate
    }

    /// Verify and store another user's certificate.
    ///
    /// Recomputes the canonical serialization and checks `signature` against
    /// the CA trust anchor. On success the certificate enters the trust
    /// store, silently replacing any prior entry for that username.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::InvalidCertificate`] if verification fails; the
    /// trust store is untouched.
    pub fn receive_certificate(
        &self,
        certificate: Certificate,
        signature: &CertificateSignature,
    ) -> Result<(), ProtocolError> {
        let verified = self.primitives.verify(
            &self.ca_public_key,
            &certificate.canonical_bytes(),
            &signature.0,
        );
        if !verified {
            return Err(ProtocolError::InvalidCertificate);
        }

        self.trust_store.write().unwrap_or_else(PoisonError::into_inner).insert(certificate);
        Ok(())
    }

    /// Encrypt `plaintext` for `peer`.
    ///
    /// Produces the peer-readable ciphertext and a header whose escrow
    /// record makes the same session key recoverable by the escrow
    /// authority. Sending mutates no engine state; replay protection is
    /// receiver-side only.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::UnknownPeer`] if `peer` has no verified certificate;
    /// [`ProtocolError::NoIdentity`] before `generate_certificate`.
    pub fn send_message(
        &self,
        peer: &str,
        plaintext: &str,
    ) -> Result<(MessageHeader, Ciphertext), ProtocolError> {
        let session_key = self.session_key_for(peer)?;

        let message_nonce = self.primitives.random_nonce();
        let body = self.primitives.aead_encrypt(&session_key, &message_nonce, plaintext.as_bytes());

        let record = escrow::seal_record(&session_key, &self.escrow_public_key, &*self.primitives);

        let header = MessageHeader {
            escrow_public_key: record.ephemeral_public,
            escrow_ciphertext: record.ciphertext,
            escrow_nonce: record.nonce,
            message_nonce,
            message_id: self.clock.next(),
        };

        Ok((header, Ciphertext::new(body)))
    }

    /// Decrypt a message received from `peer`.
    ///
    /// The replay check runs before any decryption, and the session's last
    /// accepted identifier is updated in the same critical section as the
    /// check — a concurrent duplicate delivery cannot race past it.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::UnknownPeer`], [`ProtocolError::ReplayDetected`],
    /// [`ProtocolError::DecryptionFailure`], [`ProtocolError::NoIdentity`].
    pub fn receive_message(
        &self,
        peer: &str,
        header: &MessageHeader,
        ciphertext: &Ciphertext,
    ) -> Result<String, ProtocolError> {
        let session_key = self.session_key_for(peer)?;

        self.sessions.accept(peer, header.message_id)?;

        let body = self.primitives.aead_decrypt(
            &session_key,
            &header.message_nonce,
            ciphertext.as_bytes(),
        )?;

        String::from_utf8(body).map_err(|_| ProtocolError::DecryptionFailure)
    }

    /// Username of this engine's identity, if one has been generated.
    pub fn username(&self) -> Option<String> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|identity| identity.username.clone())
    }

    /// Check whether `peer` has a verified certificate in the trust store.
    pub fn trusts(&self, peer: &str) -> bool {
        self.trust_store.read().unwrap_or_else(PoisonError::into_inner).contains(peer)
    }

    /// Derive the symmetric key shared with `peer`.
    ///
    /// Identical on the send and receive paths: key agreement between this
    /// engine's private key and the peer's certified public key, then the
    /// fixed-context derivation.
    fn session_key_for(&self, peer: &str) -> Result<cachet_crypto::SymmetricKey, ProtocolError> {
        let peer_public = {
            let trust_store = self.trust_store.read().unwrap_or_else(PoisonError::into_inner);
            let certificate = trust_store
                .get(peer)
                .ok_or_else(|| ProtocolError::UnknownPeer { username: peer.to_string() })?;
            certificate.public_key
        };

        let identity = self.identity.read().unwrap_or_else(PoisonError::into_inner);
        let identity = identity.as_ref().ok_or(ProtocolError::NoIdentity)?;

        let shared = self.primitives.diffie_hellman(&identity.keypair.secret, &peer_public);
        Ok(self.primitives.derive_symmetric_key(&shared))
    }
}

impl std::fmt::Debug for ParticipantEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantEngine")
            .field("username", &self.username())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use cachet_crypto::OsPrimitives;

    use super::*;
    use crate::authority::CertificateAuthority;

    struct World {
        ca: CertificateAuthority,
        escrow_public: AgreementPublicKey,
    }

    impl World {
        fn new() -> Self {
            let primitives: Arc<dyn Primitives> = Arc::new(OsPrimitives);
            let escrow = crate::escrow::EscrowAuthority::new(Arc::clone(&primitives));
            Self { ca: CertificateAuthority::new(primitives), escrow_public: escrow.public_key() }
        }

        fn engine(&self) -> ParticipantEngine {
            ParticipantEngine::new(
                self.ca.verifying_key(),
                self.escrow_public,
                Arc::new(OsPrimitives),
            )
        }

        fn certified_engine(&self, username: &str) -> (ParticipantEngine, Certificate) {
            let engine = self.engine();
            let certificate = engine.generate_certificate(username);
            (engine, certificate)
        }
    }

    fn introduce(world: &World, a: &ParticipantEngine, cert_b: &Certificate) {
        let signature = world.ca.sign(cert_b);
        a.receive_certificate(cert_b.clone(), &signature).unwrap();
    }

    #[test]
    fn generate_certificate_sets_identity() {
        let world = World::new();
        let engine = world.engine();
        assert_eq!(engine.username(), None);

        let certificate = engine.generate_certificate("alice");
        assert_eq!(certificate.username, "alice");
        assert_eq!(engine.username(), Some("alice".to_string()));
    }

    #[test]
    fn regeneration_replaces_the_key_pair() {
        let world = World::new();
        let engine = world.engine();

        let first = engine.generate_certificate("alice");
        let second = engine.generate_certificate("alice");
        assert_ne!(first.public_key, second.public_key);
    }

    #[test]
    fn valid_certificate_enters_the_trust_store() {
        let world = World::new();
        let (alice, _) = world.certified_engine("alice");
        let (_, cert_bob) = world.certified_engine("bob");

        assert!(!alice.trusts("bob"));
        introduce(&world, &alice, &cert_bob);
        assert!(alice.trusts("bob"));
    }

    #[test]
    fn forged_signature_is_rejected_without_state_change() {
        let world = World::new();
        let (alice, _) = world.certified_engine("alice");
        let (_, cert_bob) = world.certified_engine("bob");

        let rogue_ca = CertificateAuthority::new(Arc::new(OsPrimitives));
        let forged = rogue_ca.sign(&cert_bob);

        let result = alice.receive_certificate(cert_bob, &forged);
        assert_eq!(result, Err(ProtocolError::InvalidCertificate));
        assert!(!alice.trusts("bob"));
    }

    #[test]
    fn send_to_untrusted_peer_fails() {
        let world = World::new();
        let (alice, _) = world.certified_engine("alice");

        let result = alice.send_message("bob", "hello");
        assert!(matches!(result, Err(ProtocolError::UnknownPeer { username }) if username == "bob"));
    }

    #[test]
    fn send_without_identity_fails() {
        let world = World::new();
        let engine = world.engine();
        let (_, cert_bob) = world.certified_engine("bob");
        introduce(&world, &engine, &cert_bob);

        let result = engine.send_message("bob", "hello");
        assert!(matches!(result, Err(ProtocolError::NoIdentity)));
    }

    #[test]
    fn round_trip_between_two_engines() {
        let world = World::new();
        let (alice, cert_alice) = world.certified_engine("alice");
        let (bob, cert_bob) = world.certified_engine("bob");
        introduce(&world, &alice, &cert_bob);
        introduce(&world, &bob, &cert_alice);

        let (header, ciphertext) = alice.send_message("bob", "Hello, Bob!").unwrap();
        let plaintext = bob.receive_message("alice", &header, &ciphertext).unwrap();

        assert_eq!(plaintext, "Hello, Bob!");
    }

    #[test]
    fn sending_does_not_mutate_sessions() {
        let world = World::new();
        let (alice, cert_alice) = world.certified_engine("alice");
        let (bob, cert_bob) = world.certified_engine("bob");
        introduce(&world, &alice, &cert_bob);
        introduce(&world, &bob, &cert_alice);

        let (header, ciphertext) = alice.send_message("bob", "first").unwrap();
        alice.send_message("bob", "second").unwrap();

        // Replay state belongs to the receiver; the sender's own sends must
        // not have created a session for bob
        assert_eq!(alice.sessions.last_accepted("bob"), None);
        assert_eq!(bob.receive_message("alice", &header, &ciphertext).unwrap(), "first");
    }

    #[test]
    fn message_ids_increase_per_engine() {
        let world = World::new();
        let (alice, _) = world.certified_engine("alice");
        let (_, cert_bob) = world.certified_engine("bob");
        introduce(&world, &alice, &cert_bob);

        let (first, _) = alice.send_message("bob", "one").unwrap();
        let (second, _) = alice.send_message("bob", "two").unwrap();
        assert!(second.message_id > first.message_id);
    }
}
