//! Cachet gateway demo binary.
//!
//! Runs the two-participant protocol scenario against an in-process gateway:
//! both participants register and receive CA-signed certificates, exchange
//! and verify them, then one message travels sender → mailbox → recipient.
//!
//! # Usage
//!
//! ```bash
//! cachet-gateway --sender alice --recipient bob --message "Hello, Bob!"
//! ```

use std::sync::Arc;

use cachet_gateway::{Gateway, GatewayError, MemoryMailbox};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Cachet protocol demo driver
#[derive(Parser, Debug)]
#[command(name = "cachet-gateway")]
#[command(about = "Runs the Cachet certificate-and-message scenario in process")]
#[command(version)]
struct Args {
    /// Username of the sending participant
    #[arg(long, default_value = "alice")]
    sender: String,

    /// Username of the receiving participant
    #[arg(long, default_value = "bob")]
    recipient: String,

    /// Message to encrypt and deliver
    #[arg(long, default_value = "Hello, Bob!")]
    message: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), GatewayError> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let gateway = Gateway::new(Arc::new(cachet_crypto::OsPrimitives), MemoryMailbox::new());

    let (sender_cert, sender_sig) = gateway.create_client(&args.sender)?;
    let (recipient_cert, recipient_sig) = gateway.create_client(&args.recipient)?;

    gateway.submit_certificate(&args.sender, recipient_cert, &recipient_sig)?;
    gateway.submit_certificate(&args.recipient, sender_cert, &sender_sig)?;

    let (header, _ciphertext) = gateway.send_message(&args.sender, &args.recipient, &args.message)?;

    // Recipient pulls the newest queued envelope from the mailbox
    let plaintext = gateway.receive_message(&args.recipient, &args.sender, None)?;
    tracing::info!(%plaintext, "scenario round trip complete");

    // The escrow authority can recover the session key from the header alone
    let escrowed = gateway.escrow_authority().open_record(&header).is_ok();
    tracing::info!(recoverable = escrowed, "escrow record checked");

    Ok(())
}
