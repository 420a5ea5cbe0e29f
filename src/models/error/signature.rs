use serde::Serialize;
use thiserror::Error;

use crate::services::AwsKmsError;

/// Errors produced while turning a KMS signature into an Ethereum signature.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SignatureError {
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Malformed public key: {0}")]
    MalformedPublicKey(String),

    #[error("Recovery mismatch: {0}")]
    RecoveryMismatch(String),

    #[error("Upstream signing error: {0}")]
    UpstreamSigningError(AwsKmsError),

    #[error("Invalid signer configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid chain id: {0} cannot be EIP-155 encoded")]
    InvalidChainId(u64),

    #[error("Invalid v value: {0} does not fit the requested encoding")]
    InvalidV(u64),

    #[error("Account mismatch: {0}")]
    AccountMismatch(String),
}

impl SignatureError {
    /// Determines if the caller may retry the operation that produced this error.
    ///
    /// Only unclassified failures of the remote signing service (throttling,
    /// network errors) can change between attempts. Denied access, a missing
    /// or disabled key and everything computed locally are permanent.
    pub fn is_transient(&self) -> bool {
        matches!(self, SignatureError::UpstreamSigningError(err) if err.is_transient())
    }
}

impl From<AwsKmsError> for SignatureError {
    fn from(error: AwsKmsError) -> Self {
        match error {
            AwsKmsError::ConfigError(msg) => SignatureError::InvalidConfiguration(msg),
            other => SignatureError::UpstreamSigningError(other),
        }
    }
}
