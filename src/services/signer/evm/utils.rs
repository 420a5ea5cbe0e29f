//! Signature adaptation for EVM KMS signers.
//!
//! Pure composition of the DER codec, low-S canonicalizer, recovery resolver
//! and chain-encoding policy. No I/O happens here.

use alloy::primitives::Address;

use super::chain_encoding::encode_v;
use crate::{
    models::{ChainContext, DigestMessage, EthereumSignature, SignatureError},
    utils::{canonicalize, decode_signature, resolve_recovery_id},
};

/// Turns a KMS DER signature into an Ethereum `(r, s, v)` triple.
///
/// The order is fixed: decode, canonicalize, resolve the recovery id against
/// `expected_address`, encode `v` for `chain_context`.
///
/// # Parameters
///
/// * `der_signature` - DER-encoded signature from KMS
/// * `digest` - The 32-byte hash that was signed
/// * `expected_address` - Address of the key that produced the signature
/// * `chain_context` - How the recovery id is encoded into `v`
pub fn adapt_der_signature(
    der_signature: &[u8],
    digest: &DigestMessage,
    expected_address: &Address,
    chain_context: ChainContext,
) -> Result<EthereumSignature, SignatureError> {
    let raw = decode_signature(der_signature)?;
    let canonical = canonicalize(raw);
    let recovery_id = resolve_recovery_id(digest, &canonical, expected_address)?;
    let v = encode_v(recovery_id, chain_context)?;

    Ok(EthereumSignature {
        r: canonical.r(),
        s: canonical.s(),
        v,
    })
}
