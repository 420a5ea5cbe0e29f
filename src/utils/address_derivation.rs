//! Derivation of Ethereum addresses from secp256k1 public keys.
//!
//! The address is the low 20 bytes of `keccak256(x || y)`. DER and PEM
//! entry points are provided for keys fetched from a KMS.

use alloy::primitives::Address;
use sha3::{Digest, Keccak256};

use super::der::decode_public_key;
use crate::models::{PublicKeyPoint, SignatureError};

/// Derive the Ethereum address of an uncompressed public key point.
pub fn derive_address(point: &PublicKeyPoint) -> Address {
    let mut hasher = Keccak256::new();
    hasher.update(point.coordinates());
    let hash = hasher.finalize();

    // Take the last 20 bytes of the hash
    Address::from_slice(&hash[hash.len() - 20..])
}

/// Lowercase `0x`-prefixed hex form used for comparisons and logs.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Derive EVM address from a DER SubjectPublicKeyInfo.
pub fn derive_ethereum_address_from_der(der: &[u8]) -> Result<Address, SignatureError> {
    let point = decode_public_key(der)?;
    Ok(derive_address(&point))
}

/// Derive EVM address from the PEM string.
pub fn derive_ethereum_address_from_pem(pem_str: &str) -> Result<Address, SignatureError> {
    let pkey =
        pem::parse(pem_str).map_err(|e| SignatureError::MalformedPublicKey(e.to_string()))?;
    derive_ethereum_address_from_der(pkey.contents())
}
