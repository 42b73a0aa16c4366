//! The request gateway over registry, mailbox, and authority roles
//!
//! Owns the CA and escrow authority key pairs (initialized once at
//! construction, before any engine operation is reachable) and routes
//! transport requests to the right participant engine. The gateway mirrors
//! the abstract operation surface: certificate issuance, certificate
//! submission, message encryption, and message decryption.

use std::sync::{Arc, PoisonError, RwLock};

use cachet_core::{
    Certificate, CertificateAuthority, CertificateSignature, Ciphertext, EscrowAuthority,
    MessageHeader, ParticipantEngine,
};
use cachet_crypto::Primitives;

use crate::{
    error::GatewayError,
    mailbox::{Envelope, Mailbox},
    registry::EngineRegistry,
};

/// Routes transport requests to participant engines.
pub struct Gateway<M: Mailbox> {
    authority: CertificateAuthority,
    escrow: EscrowAuthority,
    primitives: Arc<dyn Primitives>,
    registry: RwLock<EngineRegistry>,
    mailbox: M,
}

impl<M: Mailbox> Gateway<M> {
    /// Create a gateway with freshly generated CA and escrow key pairs.
    pub fn new(primitives: Arc<dyn Primitives>, mailbox: M) -> Self {
        Self {
            authority: CertificateAuthority::new(Arc::clone(&primitives)),
            escrow: EscrowAuthority::new(Arc::clone(&primitives)),
            primitives,
            registry: RwLock::new(EngineRegistry::new()),
            mailbox,
        }
    }

    /// The escrow authority role, for record recovery.
    pub fn escrow_authority(&self) -> &EscrowAuthority {
        &self.escrow
    }

    /// Register a new participant and issue their signed certificate.
    ///
    /// Creates the engine, generates its certificate, signs it with the CA
    /// key, and provisions the participant's mailbox.
    ///
    /// # Errors
    ///
    /// [`GatewayError::ClientExists`] if the username is taken.
    pub fn create_client(
        &self,
        username: &str,
    ) -> Result<(Certificate, CertificateSignature), GatewayError> {
        let engine = Arc::new(ParticipantEngine::new(
            self.authority.verifying_key(),
            self.escrow.public_key(),
            Arc::clone(&self.primitives),
        ));
        let certificate = engine.generate_certificate(username);

        {
            let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
            if !registry.register(username, engine) {
                return Err(GatewayError::ClientExists { username: username.to_string() });
            }
        }

        let signature = self.authority.sign(&certificate);
        self.mailbox.provision(username)?;

        tracing::info!(%username, "client registered and certified");
        Ok((certificate, signature))
    }

    /// Route a signed certificate to a registered client for verification.
    pub fn submit_certificate(
        &self,
        username: &str,
        certificate: Certificate,
        signature: &CertificateSignature,
    ) -> Result<(), GatewayError> {
        let engine = self.engine(username)?;
        let peer = certificate.username.clone();

        engine.receive_certificate(certificate, signature).inspect_err(|error| {
            tracing::warn!(%username, %peer, %error, "certificate rejected");
        })?;

        tracing::info!(%username, %peer, "certificate verified and trusted");
        Ok(())
    }

    /// Encrypt a message from `sender` to `recipient` and queue it for
    /// delivery.
    ///
    /// Both usernames must be registered. The returned pair is also handed
    /// to the caller so a transport can echo it to the sender.
    pub fn send_message(
        &self,
        sender: &str,
        recipient: &str,
        plaintext: &str,
    ) -> Result<(MessageHeader, Ciphertext), GatewayError> {
        let engine = self.engine(sender)?;
        if !self.is_registered(recipient) {
            return Err(GatewayError::ClientNotFound { username: recipient.to_string() });
        }

        let (header, ciphertext) = engine.send_message(recipient, plaintext)?;

        self.mailbox.push(
            recipient,
            Envelope {
                sender: sender.to_string(),
                header: header.clone(),
                ciphertext: ciphertext.clone(),
            },
        )?;

        tracing::info!(%sender, %recipient, message_id = header.message_id, "message queued");
        Ok((header, ciphertext))
    }

    /// Decrypt a message for `recipient` from `sender`.
    ///
    /// With an explicit `delivery` the pair is decrypted as given; with
    /// `None` the newest queued envelope from `sender` is delivered.
    pub fn receive_message(
        &self,
        recipient: &str,
        sender: &str,
        delivery: Option<(MessageHeader, Ciphertext)>,
    ) -> Result<String, GatewayError> {
        let engine = self.engine(recipient)?;
        if !self.is_registered(sender) {
            return Err(GatewayError::ClientNotFound { username: sender.to_string() });
        }

        let (header, ciphertext) = match delivery {
            Some(pair) => pair,
            None => {
                let envelope = self.mailbox.latest(recipient, sender)?.ok_or_else(|| {
                    GatewayError::EmptyMailbox {
                        sender: sender.to_string(),
                        recipient: recipient.to_string(),
                    }
                })?;
                (envelope.header, envelope.ciphertext)
            },
        };

        let plaintext =
            engine.receive_message(sender, &header, &ciphertext).inspect_err(|error| {
                tracing::warn!(%recipient, %sender, %error, "message rejected");
            })?;

        tracing::info!(%recipient, %sender, message_id = header.message_id, "message delivered");
        Ok(plaintext)
    }

    fn engine(&self, username: &str) -> Result<Arc<ParticipantEngine>, GatewayError> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .ok_or_else(|| GatewayError::ClientNotFound { username: username.to_string() })
    }

    fn is_registered(&self, username: &str) -> bool {
        self.registry.read().unwrap_or_else(PoisonError::into_inner).contains(username)
    }
}

impl<M: Mailbox> std::fmt::Debug for Gateway<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let clients = self.registry.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("Gateway").field("clients", &clients).finish_non_exhaustive()
    }
}
