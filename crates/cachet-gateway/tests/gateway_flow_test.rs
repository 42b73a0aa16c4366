//! Gateway flow tests: registry, mailbox, and routing end to end

use std::sync::Arc;

use cachet_core::ProtocolError;
use cachet_crypto::OsPrimitives;
use cachet_gateway::{Envelope, Gateway, GatewayError, MemoryMailbox};

fn gateway() -> Gateway<MemoryMailbox> {
    Gateway::new(Arc::new(OsPrimitives), MemoryMailbox::new())
}

/// Register both participants and exchange their signed certificates.
fn connect(gateway: &Gateway<MemoryMailbox>, a: &str, b: &str) {
    let (cert_a, sig_a) = gateway.create_client(a).unwrap();
    let (cert_b, sig_b) = gateway.create_client(b).unwrap();

    gateway.submit_certificate(a, cert_b, &sig_b).unwrap();
    gateway.submit_certificate(b, cert_a, &sig_a).unwrap();
}

#[test]
fn full_scenario_through_the_gateway() {
    let gateway = gateway();
    connect(&gateway, "alice", "bob");

    let (header, ciphertext) = gateway.send_message("alice", "bob", "Hello, Bob!").unwrap();

    // Explicit delivery of the returned pair
    let plaintext =
        gateway.receive_message("bob", "alice", Some((header, ciphertext))).unwrap();
    assert_eq!(plaintext, "Hello, Bob!");
}

#[test]
fn mailbox_delivery_without_an_explicit_pair() {
    let gateway = gateway();
    connect(&gateway, "alice", "bob");

    gateway.send_message("alice", "bob", "queued message").unwrap();

    let plaintext = gateway.receive_message("bob", "alice", None).unwrap();
    assert_eq!(plaintext, "queued message");
}

#[test]
fn mailbox_fallback_delivers_the_newest_envelope() {
    let gateway = gateway();
    connect(&gateway, "alice", "bob");

    gateway.send_message("alice", "bob", "older").unwrap();
    gateway.send_message("alice", "bob", "newest").unwrap();

    let plaintext = gateway.receive_message("bob", "alice", None).unwrap();
    assert_eq!(plaintext, "newest");
}

#[test]
fn duplicate_registration_is_rejected() {
    let gateway = gateway();
    gateway.create_client("alice").unwrap();

    let result = gateway.create_client("alice");
    assert!(matches!(result, Err(GatewayError::ClientExists { username }) if username == "alice"));
}

#[test]
fn operations_on_unregistered_clients_fail() {
    let gateway = gateway();
    let (cert, sig) = gateway.create_client("alice").unwrap();

    assert!(matches!(
        gateway.submit_certificate("ghost", cert, &sig),
        Err(GatewayError::ClientNotFound { username }) if username == "ghost"
    ));
    assert!(matches!(
        gateway.send_message("ghost", "alice", "hi"),
        Err(GatewayError::ClientNotFound { username }) if username == "ghost"
    ));
    assert!(matches!(
        gateway.send_message("alice", "ghost", "hi"),
        Err(GatewayError::ClientNotFound { username }) if username == "ghost"
    ));
    assert!(matches!(
        gateway.receive_message("ghost", "alice", None),
        Err(GatewayError::ClientNotFound { username }) if username == "ghost"
    ));
}

#[test]
fn sending_without_certificate_exchange_is_unknown_peer() {
    let gateway = gateway();
    gateway.create_client("alice").unwrap();
    gateway.create_client("bob").unwrap();

    // Registered, but alice never verified bob's certificate
    let result = gateway.send_message("alice", "bob", "premature");
    assert!(matches!(
        result,
        Err(GatewayError::Protocol(ProtocolError::UnknownPeer { username })) if username == "bob"
    ));
}

#[test]
fn empty_mailbox_is_reported() {
    let gateway = gateway();
    connect(&gateway, "alice", "bob");

    let result = gateway.receive_message("bob", "alice", None);
    assert!(matches!(
        result,
        Err(GatewayError::EmptyMailbox { sender, recipient })
            if sender == "alice" && recipient == "bob"
    ));
}

#[test]
fn replay_through_the_gateway_is_rejected() {
    let gateway = gateway();
    connect(&gateway, "alice", "bob");

    let (header, ciphertext) = gateway.send_message("alice", "bob", "once").unwrap();

    gateway
        .receive_message("bob", "alice", Some((header.clone(), ciphertext.clone())))
        .unwrap();

    let replayed = gateway.receive_message("bob", "alice", Some((header.clone(), ciphertext)));
    assert!(matches!(
        replayed,
        Err(GatewayError::Protocol(ProtocolError::ReplayDetected { message_id }))
            if message_id == header.message_id
    ));
}

#[test]
fn escrow_authority_recovers_keys_for_gateway_traffic() {
    let gateway = gateway();
    connect(&gateway, "alice", "bob");

    let (header, ciphertext) = gateway.send_message("alice", "bob", "captured").unwrap();

    let session_key = gateway.escrow_authority().open_record(&header).unwrap();
    let body =
        cachet_crypto::aead::decrypt(&session_key, &header.message_nonce, ciphertext.as_bytes())
            .unwrap();
    assert_eq!(body, b"captured");
}

#[test]
fn envelope_round_trip_preserves_key_material_byte_exactly() {
    let gateway = gateway();
    connect(&gateway, "alice", "bob");

    // Persisted shape: encoding is an implementation choice as long as the
    // round trip is byte-exact
    let (header, ciphertext) = gateway.send_message("alice", "bob", "serialize me").unwrap();
    let envelope =
        Envelope { sender: "alice".to_string(), header: header.clone(), ciphertext };

    let mut bytes = Vec::new();
    ciborium::ser::into_writer(&envelope, &mut bytes).unwrap();
    let decoded: Envelope = ciborium::de::from_reader(bytes.as_slice()).unwrap();

    assert_eq!(decoded, envelope);
    assert_eq!(
        decoded.header.escrow_public_key.as_bytes(),
        header.escrow_public_key.as_bytes()
    );
}
