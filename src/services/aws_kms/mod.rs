//! # AWS KMS Service Module
//!
//! This module provides integration with AWS KMS for secp256k1 keys: public
//! key retrieval and digest signing. It returns the raw DER blobs exactly as
//! KMS produced them; turning them into Ethereum signatures is the job of
//! [`crate::services::signer::evm`].
//!
//! ## Architecture
//!
//! ```text
//! AwsKmsClient (implements AwsKmsK256)
//!   ├── Authentication (via aws-config default credential chain)
//!   ├── Public Key Retrieval in DER Encoding (cached per key id)
//!   └── Digest Signing (ECDSA_SHA_256, MessageType::Digest)
//! ```
//! `AwsKmsK256` is mocked with `mockall` for unit testing and injected into
//! `EvmKmsSigner`.

use async_trait::async_trait;
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region};
use aws_sdk_kms::{
    error::ProvideErrorMetadata,
    primitives::Blob,
    types::{MessageType, SigningAlgorithmSpec},
    Client,
};
use log::debug;
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use crate::config::KmsSignerConfig;

#[cfg(test)]
use mockall::automock;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Serialize)]
pub enum AwsKmsError {
    #[error("AWS KMS config error: {0}")]
    ConfigError(String),
    #[error("AWS KMS get error: {0}")]
    GetError(String),
    #[error("AWS KMS signing error: {0}")]
    SignError(String),
    #[error("AWS KMS permission error: {0}")]
    PermissionError(String),
    #[error("AWS KMS key not found: {0}")]
    KeyNotFound(String),
    #[error("AWS KMS key unusable: {0}")]
    KeyUnusable(String),
}

impl AwsKmsError {
    /// Whether the same request may succeed when sent again.
    ///
    /// Unclassified get and sign failures cover throttling and network
    /// errors. Configuration, permission and key-state failures do not change
    /// on their own.
    pub fn is_transient(&self) -> bool {
        matches!(self, AwsKmsError::GetError(_) | AwsKmsError::SignError(_))
    }
}

const ACCESS_DENIED_CODE: &str = "AccessDeniedException";
const NOT_FOUND_CODE: &str = "NotFoundException";
const KEY_UNUSABLE_CODES: [&str; 3] = [
    "DisabledException",
    "InvalidKeyUsageException",
    "KMSInvalidStateException",
];

/// Maps an SDK failure onto [`AwsKmsError`] by its service error code.
fn map_sdk_error<E>(err: E, context: String, fallback: fn(String) -> AwsKmsError) -> AwsKmsError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
{
    let detail = || format!("{context}: {}", err.message().unwrap_or(""));
    match err.code() {
        Some(ACCESS_DENIED_CODE) => AwsKmsError::PermissionError(detail()),
        Some(NOT_FOUND_CODE) => AwsKmsError::KeyNotFound(detail()),
        Some(code) if KEY_UNUSABLE_CODES.contains(&code) => {
            AwsKmsError::KeyUnusable(format!("{} ({code})", detail()))
        }
        _ => fallback(format!("{context}: {err:?}")),
    }
}

pub type AwsKmsResult<T> = Result<T, AwsKmsError>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AwsKmsK256: Send + Sync {
    /// Fetches the DER-encoded public key from AWS KMS.
    async fn get_der_public_key<'a, 'b>(&'a self, key_id: &'b str) -> AwsKmsResult<Vec<u8>>;
    /// Signs a digest using EcdsaSha256 spec. Returns DER-encoded signature
    async fn sign_digest<'a, 'b>(
        &'a self,
        key_id: &'b str,
        digest: [u8; 32],
    ) -> AwsKmsResult<Vec<u8>>;
}

/// DER public keys by key id, scoped to one client.
///
/// A key id (or alias) only names a key within one account, region and
/// endpoint, so entries are never shared between clients. Clones of a client
/// share its cache.
#[derive(Debug, Clone, Default)]
struct DerPublicKeyCache {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl DerPublicKeyCache {
    async fn get(&self, key_id: &str) -> Option<Vec<u8>> {
        self.entries.read().await.get(key_id).cloned()
    }

    async fn insert(&self, key_id: &str, der: Vec<u8>) {
        self.entries.write().await.insert(key_id.to_string(), der);
    }
}

#[derive(Debug, Clone)]
pub struct AwsKmsClient {
    inner: Client,
    der_pk_cache: DerPublicKeyCache,
}

impl AwsKmsClient {
    /// Builds a client from the default AWS credential chain.
    ///
    /// `region` falls back to the environment when unset; `endpoint` points the
    /// client at a KMS-compatible service such as a local emulator.
    pub async fn new(config: &KmsSignerConfig) -> AwsKmsResult<Self> {
        if config.key_id.trim().is_empty() {
            return Err(AwsKmsError::ConfigError("KMS key id is empty".to_string()));
        }

        let region_provider = RegionProviderChain::first_try(config.region.clone().map(Region::new))
            .or_default_provider();

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
        if let Some(endpoint) = config.endpoint.as_deref() {
            debug!("Using custom KMS endpoint: {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Ok(Self {
            inner: Client::new(&sdk_config),
            der_pk_cache: DerPublicKeyCache::default(),
        })
    }
}

#[async_trait]
impl AwsKmsK256 for AwsKmsClient {
    async fn get_der_public_key<'a, 'b>(&'a self, key_id: &'b str) -> AwsKmsResult<Vec<u8>> {
        if let Some(cached) = self.der_pk_cache.get(key_id).await {
            return Ok(cached);
        }

        debug!("Fetching secp256k1 public key from AWS KMS, key_id: {}", key_id);
        let get_output = self
            .inner
            .get_public_key()
            .key_id(key_id)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(
                    e,
                    format!("Failed to get secp256k1 public key for key '{key_id}'"),
                    AwsKmsError::GetError,
                )
            })?;

        let der_pk_blob = get_output
            .public_key
            .ok_or(AwsKmsError::GetError(
                "No public key blob found".to_string(),
            ))?
            .into_inner();

        self.der_pk_cache.insert(key_id, der_pk_blob.clone()).await;

        Ok(der_pk_blob)
    }

    async fn sign_digest<'a, 'b>(
        &'a self,
        key_id: &'b str,
        digest: [u8; 32],
    ) -> AwsKmsResult<Vec<u8>> {
        debug!("Signing digest with AWS KMS, key_id: {}", key_id);
        let sign_result = self
            .inner
            .sign()
            .key_id(key_id)
            .signing_algorithm(SigningAlgorithmSpec::EcdsaSha256)
            .message_type(MessageType::Digest)
            .message(Blob::new(digest))
            .send()
            .await;

        let der_signature = sign_result
            .map_err(|e| {
                map_sdk_error(
                    e,
                    format!("Failed to sign digest with key '{key_id}'"),
                    AwsKmsError::SignError,
                )
            })?
            .signature
            .ok_or(AwsKmsError::SignError(
                "Signature not found in response".to_string(),
            ))?
            .into_inner();

        Ok(der_signature)
    }
}
