//! Cachet Cryptographic Primitives
//!
//! Cryptographic building blocks for the Cachet protocol. The modules expose
//! pure functions with deterministic outputs; callers provide randomness so
//! tests can be deterministic. The [`Primitives`] trait bundles the same
//! contracts into an injectable interface for the protocol roles.
//!
//! # Key Lifecycle
//!
//! Every participant owns a long-lived X25519 agreement key pair, bound to a
//! username by a CA-signed certificate. Each message derives its symmetric
//! key from a Diffie-Hellman agreement between the sender's long-lived key
//! and the recipient's certified key:
//!
//! ```text
//! X25519 DH (sender secret, recipient public)
//!        │
//!        ▼
//! HKDF-SHA256 (fixed protocol context) → Session Key
//!        │
//!        ▼
//! XChaCha20-Poly1305 → Ciphertext
//! ```
//!
//! The escrow path runs the same pipeline once more per message with a fresh
//! single-use key pair against the escrow authority's long-lived public key,
//! wrapping the session key itself.
//!
//! # Security
//!
//! - Authenticity: XChaCha20-Poly1305 rejects any tampered ciphertext; a
//!   failed tag means the caller sees an opaque error, nothing else.
//! - Key separation: the fixed derivation context ensures derived keys are
//!   protocol-specific and never usable as raw DH output.
//! - Escrow isolation: escrow key material is generated fresh per message,
//!   so one opened record exposes no other message's session key.
//! - Secret hygiene: secret keys, shared secrets, and symmetric keys zeroize
//!   their bytes on drop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aead;
pub mod derive;
mod error;
pub mod keys;
mod provider;
pub mod sign;

pub use aead::{NONCE_SIZE, TAG_SIZE};
pub use derive::KEY_CONTEXT;
pub use error::CryptoError;
pub use keys::{AgreementKeyPair, AgreementPublicKey, AgreementSecretKey, SharedSecret, SymmetricKey};
pub use provider::{OsPrimitives, Primitives};
pub use sign::{Signature, SigningKeyPair, SigningPublicKey, SigningSecretKey};
