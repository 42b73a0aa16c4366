//! Cachet Request Gateway
//!
//! The external collaborators around the protocol core, specified at their
//! interface: an explicit engine registry (one engine per registered
//! username), a per-recipient mailbox of undelivered envelopes, and the
//! [`Gateway`] router that ties them to the CA and escrow authority roles.
//!
//! Wire framing is deliberately absent — a transport (HTTP, RPC, in-process
//! calls) maps its requests onto the gateway operations and owns retry and
//! timeout policy.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
pub mod gateway;
pub mod mailbox;
pub mod registry;

pub use error::{GatewayError, MailboxError};
pub use gateway::Gateway;
pub use mailbox::{Envelope, Mailbox, MemoryMailbox};
pub use registry::EngineRegistry;
