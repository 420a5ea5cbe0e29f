//! # KMS Address Tool
//!
//! Prints the Ethereum address of a secp256k1 key held in AWS KMS and,
//! optionally, an EIP-191 signature of a message.
//!
//! ## Usage
//!
//! ```bash
//! # Key id and region from the environment (KMS_KEY_ID, AWS_REGION, ...)
//! cargo run --example kms_address
//!
//! # Explicit key against a local KMS emulator, signing a message
//! cargo run --example kms_address -- \
//!   --key-id "alias/relayer" \
//!   --endpoint "http://localhost:4566" \
//!   --message "hello"
//!
//! # Offline: address of a PEM public key exported from KMS
//! cargo run --example kms_address -- --pem public_key.pem
//! ```

use clap::Parser;
use eyre::{Result, WrapErr};
use evm_kms_signer::{
    config::KmsSignerConfig,
    logging::setup_logging,
    services::{EvmKmsSigner, Signer},
    utils::{derive_ethereum_address_from_pem, format_address},
};
use std::fs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// KMS key id, ARN or alias. Defaults to KMS_KEY_ID.
    #[arg(long)]
    key_id: Option<String>,

    /// AWS region. Defaults to AWS_REGION or the SDK default chain.
    #[arg(long)]
    region: Option<String>,

    /// KMS endpoint override, e.g. a local emulator.
    #[arg(long)]
    endpoint: Option<String>,

    /// Personal message to sign with the key.
    #[arg(long)]
    message: Option<String>,

    /// Derive the address from a PEM public key file instead of calling KMS.
    #[arg(long, conflicts_with_all = ["key_id", "region", "endpoint", "message"])]
    pem: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging()?;

    if let Some(path) = args.pem {
        let pem = fs::read_to_string(&path).wrap_err_with(|| format!("reading {path}"))?;
        let address = derive_ethereum_address_from_pem(&pem)?;
        println!("Address: {}", format_address(&address));
        return Ok(());
    }

    let config = resolve_config(args.key_id, args.region, args.endpoint)?;
    let signer = EvmKmsSigner::from_config(&config).await?;

    let address = signer.address().await?;
    println!("Key:     {}", signer.key_id());
    println!("Address: {}", format_address(&address));

    if let Some(message) = args.message {
        let signature = signer.sign_message(message.as_bytes()).await?;
        println!("Signature: 0x{}", hex::encode(signature));
    }

    Ok(())
}

/// Command line values win over the environment.
fn resolve_config(
    key_id: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
) -> Result<KmsSignerConfig> {
    let mut config = match key_id {
        Some(key_id) => {
            dotenvy::dotenv().ok();
            KmsSignerConfig::new(key_id)
        }
        None => KmsSignerConfig::from_env()?,
    };

    if region.is_some() {
        config.region = region;
    }
    if endpoint.is_some() {
        config.endpoint = endpoint;
    }
    Ok(config)
}
