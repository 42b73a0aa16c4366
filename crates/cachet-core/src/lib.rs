//! Cachet Protocol Core
//!
//! Certificate-based, end-to-end encrypted messaging with a built-in
//! key-escrow path. One [`ParticipantEngine`] exists per user identity; it
//! owns that identity's agreement key pair, its trust store of verified peer
//! certificates, and per-peer replay state.
//!
//! # Protocol Flow
//!
//! ```text
//! Engine ── generate_certificate ──▶ Certificate
//!                                        │
//!                     CertificateAuthority::sign (out-of-band routing)
//!                                        │
//! Peer engine ◀── receive_certificate ───┘   (verify, then trust)
//!
//! Engine ── send_message ──▶ (MessageHeader, Ciphertext)
//!                                 │
//!                                 ├── peer path: DH + HKDF + AEAD
//!                                 └── escrow path: fresh ephemeral DH
//!                                     against the escrow authority,
//!                                     session key wrapped in the header
//!
//! Peer engine ◀── receive_message ── replay check, re-derive, decrypt
//! ```
//!
//! # Security
//!
//! - Trust: a certificate is only trusted once its CA signature verifies;
//!   nothing is encrypted to, or accepted from, an untrusted username.
//! - Escrow: every message carries a second encryption of its session key
//!   that only the escrow authority can open; escrow key material is fresh
//!   per message, so one opened record exposes nothing else.
//! - Replay: per-peer message identifiers must strictly increase; the check
//!   and the state update share one critical section, so concurrent
//!   duplicate deliveries cannot race past it.
//! - Opacity: cryptographic failures never say which byte or field failed.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod authority;
pub mod certificate;
pub mod engine;
mod error;
pub mod escrow;
pub mod message;
pub mod session;

pub use authority::CertificateAuthority;
pub use certificate::{Certificate, CertificateSignature, TrustStore};
pub use engine::ParticipantEngine;
pub use error::ProtocolError;
pub use escrow::{EscrowAuthority, EscrowRecord};
pub use message::{Ciphertext, MessageHeader, MessageIdClock};
pub use session::SessionTable;
