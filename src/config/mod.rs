//! Configuration for the KMS signer.
//!
//! Settings come either from the environment (optionally seeded from a `.env`
//! file) or from a JSON file, see [`load_config`].
use std::env;

use log::debug;
use thiserror::Error;

use crate::models::ChainContext;

mod config_file;
pub use config_file::*;

pub const KMS_KEY_ID_ENV: &str = "KMS_KEY_ID";
pub const AWS_REGION_ENV: &str = "AWS_REGION";
pub const KMS_ENDPOINT_ENV: &str = "KMS_ENDPOINT";
pub const CHAIN_ID_ENV: &str = "CHAIN_ID";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Resolved signer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmsSignerConfig {
    pub key_id: String,
    /// Falls back to the AWS default region chain when unset.
    pub region: Option<String>,
    /// Overrides the KMS endpoint, e.g. a local emulator.
    pub endpoint: Option<String>,
    /// Chain id for EIP-155 replay protection of legacy transactions.
    pub chain_id: Option<u64>,
}

impl KmsSignerConfig {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            region: None,
            endpoint: None,
            chain_id: None,
        }
    }

    /// Reads `KMS_KEY_ID`, `AWS_REGION`, `KMS_ENDPOINT` and `CHAIN_ID`.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let key_id = optional_env(KMS_KEY_ID_ENV)
            .ok_or_else(|| ConfigError::MissingEnvVar(KMS_KEY_ID_ENV.to_string()))?;

        let chain_id = optional_env(CHAIN_ID_ENV)
            .map(|value| parse_chain_id(&value))
            .transpose()?;

        Ok(Self {
            key_id,
            region: optional_env(AWS_REGION_ENV),
            endpoint: optional_env(KMS_ENDPOINT_ENV),
            chain_id,
        })
    }

    /// Picks the `v` encoding for a transaction.
    ///
    /// Typed (EIP-2718) transactions always carry a bare recovery id. Legacy
    /// transactions use EIP-155 when a chain id is configured.
    pub fn chain_context(&self, is_typed: bool) -> ChainContext {
        if is_typed {
            ChainContext::Typed
        } else {
            ChainContext::legacy(self.chain_id)
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn parse_chain_id(value: &str) -> Result<u64, ConfigError> {
    let chain_id = value
        .parse::<u64>()
        .map_err(|e| ConfigError::ParseError(format!("{CHAIN_ID_ENV} '{value}': {e}")))?;
    validate_chain_id(chain_id)?;
    Ok(chain_id)
}

pub(crate) fn validate_chain_id(chain_id: u64) -> Result<(), ConfigError> {
    if chain_id == 0 {
        return Err(ConfigError::InvalidValue(
            "Chain id must be greater than zero".into(),
        ));
    }
    Ok(())
}
