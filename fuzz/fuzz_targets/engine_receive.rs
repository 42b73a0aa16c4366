//! Fuzz target for ParticipantEngine::receive_message
//!
//! Delivers arbitrary headers and ciphertexts from a trusted peer. The
//! engine must reject every forged input with a typed error; any panic is a
//! finding.

#![no_main]

use std::sync::{Arc, OnceLock};

use arbitrary::Arbitrary;
use cachet_core::{CertificateAuthority, Ciphertext, MessageHeader, ParticipantEngine};
use cachet_crypto::{AgreementPublicKey, OsPrimitives, Primitives};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzDelivery {
    escrow_public_key: [u8; 32],
    escrow_ciphertext: Vec<u8>,
    escrow_nonce: [u8; 24],
    message_nonce: [u8; 24],
    message_id: u64,
    ciphertext: Vec<u8>,
}

fn receiver() -> &'static ParticipantEngine {
    static RECEIVER: OnceLock<ParticipantEngine> = OnceLock::new();
    RECEIVER.get_or_init(|| {
        let primitives: Arc<dyn Primitives> = Arc::new(OsPrimitives);
        let ca = CertificateAuthority::new(Arc::clone(&primitives));
        let escrow = cachet_core::EscrowAuthority::new(Arc::clone(&primitives));

        let bob = ParticipantEngine::new(ca.verifying_key(), escrow.public_key(), primitives);
        bob.generate_certificate("bob");

        let alice = ParticipantEngine::new(
            ca.verifying_key(),
            escrow.public_key(),
            Arc::new(OsPrimitives),
        );
        let cert_alice = alice.generate_certificate("alice");
        let signature = ca.sign(&cert_alice);
        if bob.receive_certificate(cert_alice, &signature).is_err() {
            unreachable!("freshly signed certificate must verify");
        }

        bob
    })
}

fuzz_target!(|input: FuzzDelivery| {
    let header = MessageHeader {
        escrow_public_key: AgreementPublicKey::from_bytes(input.escrow_public_key),
        escrow_ciphertext: input.escrow_ciphertext,
        escrow_nonce: input.escrow_nonce,
        message_nonce: input.message_nonce,
        message_id: input.message_id,
    };
    let _ = receiver().receive_message("alice", &header, &Ciphertext::new(input.ciphertext));
});
