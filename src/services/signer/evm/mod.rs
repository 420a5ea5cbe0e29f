//! # EVM KMS Signer
//!
//! Produces Ethereum signatures with a secp256k1 key held in AWS KMS.
//!
//! ## Architecture
//!
//! ```text
//! EvmKmsSigner
//!   ├── address()            - GetPublicKey -> DER SPKI -> keccak address (memoised)
//!   ├── sign_digest()        - create_signature against the signer's own address
//!   ├── sign_payload()       - keccak256(bytes) then sign_digest
//!   └── sign_message()       - EIP-191 personal message, r || s || (v + 27)
//! ```
//!
//! Every signature goes through [`create_signature`]: one KMS `Sign` call,
//! then decode, low-s normalization (EIP-2), recovery id search and `v`
//! encoding for the caller's [`ChainContext`].

mod chain_encoding;
mod utils;
pub use chain_encoding::*;
pub use utils::*;

use alloy::primitives::{eip191_hash_message, keccak256, Address};
use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::OnceCell;

use crate::{
    config::KmsSignerConfig,
    constants::SECP256K1_SIGNATURE_LENGTH,
    models::{ChainContext, DigestMessage, EthereumSignature, SignatureError},
    services::{signer::Signer, AwsKmsClient, AwsKmsK256},
    utils::{derive_ethereum_address_from_der, format_address},
};

/// Signs `digest` with the KMS key `key_id` and adapts the result.
///
/// `expected_address` must be the address of `key_id`; it is what picks the
/// recovery id. KMS failures surface as
/// [`SignatureError::UpstreamSigningError`] carrying the KMS error kind.
pub async fn create_signature<T>(
    kms: &T,
    key_id: &str,
    digest: &DigestMessage,
    expected_address: &Address,
    chain_context: ChainContext,
) -> Result<EthereumSignature, SignatureError>
where
    T: AwsKmsK256 + ?Sized,
{
    debug!(
        "Requesting KMS signature for digest 0x{} with key {}",
        hex::encode(digest),
        key_id
    );
    let der_signature = kms.sign_digest(key_id, *digest).await?;

    adapt_der_signature(&der_signature, digest, expected_address, chain_context).inspect_err(
        |e| warn!("Could not adapt KMS signature from key {}: {}", key_id, e),
    )
}

/// Ethereum signer backed by a single AWS KMS key.
#[derive(Debug)]
pub struct EvmKmsSigner<T = AwsKmsClient> {
    key_id: String,
    client: T,
    address: OnceCell<Address>,
}

impl<T: AwsKmsK256> EvmKmsSigner<T> {
    pub fn new(key_id: impl Into<String>, client: T) -> Self {
        Self {
            key_id: key_id.into(),
            client,
            address: OnceCell::new(),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Hashes serialized unsigned transaction bytes with keccak256 and signs them.
    ///
    /// Pass [`ChainContext::Typed`] for EIP-2718 payloads and
    /// [`ChainContext::Eip155`] or [`ChainContext::Legacy`] for legacy ones.
    pub async fn sign_payload(
        &self,
        payload: &[u8],
        chain_context: ChainContext,
    ) -> Result<EthereumSignature, SignatureError> {
        let digest = keccak256(payload);
        self.sign_digest(digest.0, chain_context).await
    }

    /// Signs an EIP-191 personal message.
    ///
    /// Returns the 65-byte `r || s || v` form with `v` in `{27, 28}`.
    pub async fn sign_message(
        &self,
        message: impl AsRef<[u8]> + Send,
    ) -> Result<[u8; SECP256K1_SIGNATURE_LENGTH], SignatureError> {
        let digest = eip191_hash_message(message);
        let signature = self.sign_digest(digest.0, ChainContext::Typed).await?;
        signature.to_personal_sign_bytes()
    }

    /// Like [`Self::sign_message`] but first checks that `from` is this signer.
    pub async fn sign_message_from(
        &self,
        from: &Address,
        message: impl AsRef<[u8]> + Send,
    ) -> Result<[u8; SECP256K1_SIGNATURE_LENGTH], SignatureError> {
        let address = self.address().await?;
        if *from != address {
            return Err(SignatureError::AccountMismatch(format!(
                "requested signer {} but key {} belongs to {}",
                format_address(from),
                self.key_id,
                format_address(&address)
            )));
        }
        self.sign_message(message).await
    }
}

impl EvmKmsSigner<AwsKmsClient> {
    /// Builds a signer with a real AWS KMS client.
    pub async fn from_config(config: &KmsSignerConfig) -> Result<Self, SignatureError> {
        let client = AwsKmsClient::new(config).await?;
        Ok(Self::new(config.key_id.clone(), client))
    }
}

#[async_trait]
impl<T: AwsKmsK256> Signer for EvmKmsSigner<T> {
    async fn address(&self) -> Result<Address, SignatureError> {
        self.address
            .get_or_try_init(|| async {
                let der_public_key = self.client.get_der_public_key(&self.key_id).await?;
                let address = derive_ethereum_address_from_der(&der_public_key)?;
                info!(
                    "Resolved address {} for KMS key {}",
                    format_address(&address),
                    self.key_id
                );
                Ok::<_, SignatureError>(address)
            })
            .await
            .copied()
    }

    async fn sign_digest(
        &self,
        digest: DigestMessage,
        chain_context: ChainContext,
    ) -> Result<EthereumSignature, SignatureError> {
        let address = self.address().await?;
        create_signature(&self.client, &self.key_id, &digest, &address, chain_context).await
    }
}
