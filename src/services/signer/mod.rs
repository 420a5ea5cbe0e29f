//! # Signer Module
//!
//! Signing backends that hold an Ethereum identity. The only backend is
//! [`EvmKmsSigner`], which keeps its key in AWS KMS.

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::models::{ChainContext, DigestMessage, EthereumSignature, SignatureError};

pub mod evm;
pub use evm::*;

#[async_trait]
pub trait Signer: Send + Sync {
    /// Returns the signer's ethereum address
    async fn address(&self) -> Result<Address, SignatureError>;

    /// Signs a 32-byte digest and encodes `v` for `chain_context`.
    async fn sign_digest(
        &self,
        digest: DigestMessage,
        chain_context: ChainContext,
    ) -> Result<EthereumSignature, SignatureError>;
}
