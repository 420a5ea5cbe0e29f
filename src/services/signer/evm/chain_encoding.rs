//! Mapping from a bare recovery id to the wire-level `v` value.
//!
//! | Context  | `v`                        |
//! |----------|----------------------------|
//! | Legacy   | `id + 27`                  |
//! | Eip155   | `id + chain_id * 2 + 35`   |
//! | Typed    | `id`                       |

use crate::{
    constants::{EIP155_V_OFFSET, LEGACY_V_OFFSET},
    models::{ChainContext, RecoveryId, SignatureError},
};

/// Encodes `id` into `v` under the caller-selected [`ChainContext`].
///
/// Fails with [`SignatureError::InvalidChainId`] when the EIP-155 encoding of
/// `chain_id` does not fit in a `u64`.
pub fn encode_v(id: RecoveryId, chain_context: ChainContext) -> Result<u64, SignatureError> {
    let id = id.to_byte() as u64;
    match chain_context {
        ChainContext::Legacy => Ok(id + LEGACY_V_OFFSET),
        ChainContext::Eip155 { chain_id } => chain_id
            .checked_mul(2)
            .and_then(|v| v.checked_add(EIP155_V_OFFSET))
            .and_then(|v| v.checked_add(id))
            .ok_or(SignatureError::InvalidChainId(chain_id)),
        ChainContext::Typed => Ok(id),
    }
}
