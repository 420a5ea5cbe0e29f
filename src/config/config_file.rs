//! JSON file form of the signer configuration.
//!
//! The key id may be given inline or as the name of an environment variable:
//!
//! ```json
//! {
//!   "key_id": { "type": "env", "name": "KMS_KEY_ID" },
//!   "region": "us-east-1",
//!   "chain_id": 1
//! }
//! ```
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use super::{validate_chain_id, ConfigError, KmsSignerConfig};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlainOrEnvConfigValue {
    Env { name: String },
    Plain { value: String },
}

impl PlainOrEnvConfigValue {
    pub fn get_value(&self) -> Result<String, ConfigError> {
        match self {
            PlainOrEnvConfigValue::Env { name } => {
                let value = std::env::var(name).map_err(|_| {
                    ConfigError::MissingEnvVar(format!("Environment variable {} not found", name))
                })?;
                Ok(value)
            }
            PlainOrEnvConfigValue::Plain { value } => Ok(value.clone()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KmsSignerFileConfig {
    pub key_id: PlainOrEnvConfigValue,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
}

impl KmsSignerFileConfig {
    fn validate_key_id(&self) -> Result<(), ConfigError> {
        match &self.key_id {
            PlainOrEnvConfigValue::Env { name } => {
                if name.is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "Key id environment variable name cannot be empty".into(),
                    ));
                }
                if std::env::var(name).is_err() {
                    return Err(ConfigError::MissingEnvVar(format!(
                        "Environment variable {} not found",
                        name
                    )));
                }
            }
            PlainOrEnvConfigValue::Plain { value } => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidValue("Key id cannot be empty".into()));
                }
            }
        }

        Ok(())
    }

    fn validate_endpoint(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "Endpoint must be an http(s) URL: {}",
                    endpoint
                )));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_key_id()?;

        if matches!(&self.region, Some(region) if region.trim().is_empty()) {
            return Err(ConfigError::InvalidValue("Region cannot be empty".into()));
        }
        self.validate_endpoint()?;
        if let Some(chain_id) = self.chain_id {
            validate_chain_id(chain_id)?;
        }

        Ok(())
    }
}

impl TryFrom<KmsSignerFileConfig> for KmsSignerConfig {
    type Error = ConfigError;

    fn try_from(file_config: KmsSignerFileConfig) -> Result<Self, Self::Error> {
        file_config.validate()?;
        let key_id = file_config.key_id.get_value()?.trim().to_string();
        if key_id.is_empty() {
            return Err(ConfigError::InvalidValue("Key id cannot be empty".into()));
        }

        Ok(KmsSignerConfig {
            key_id,
            region: file_config.region,
            endpoint: file_config.endpoint,
            chain_id: file_config.chain_id,
        })
    }
}

/// Reads, validates and resolves a JSON signer configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<KmsSignerConfig, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    let file_config: KmsSignerFileConfig = serde_json::from_str(&config_str)
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
    KmsSignerConfig::try_from(file_config)
}
