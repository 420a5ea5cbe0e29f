/// Offset added to the recovery id for pre-EIP-155 legacy signatures
/// and, at serialization time, for personal-message signatures.
pub const LEGACY_V_OFFSET: u64 = 27;

/// Constant term of the EIP-155 `v` encoding: `id + chain_id * 2 + 35`.
pub const EIP155_V_OFFSET: u64 = 35;

/// Length of a serialized `r || s || v` signature.
pub const SECP256K1_SIGNATURE_LENGTH: usize = 65;

/// Length of the digest handed to the KMS.
pub const DIGEST_LENGTH: usize = 32;
