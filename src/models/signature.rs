//! Value types flowing through the signature adaptation layer.
//!
//! ```text
//! DER bytes ──decode──▶ RawSignature ──canonicalize──▶ CanonicalSignature
//!                                                           │
//!                        RecoveryId ◀──resolve──────────────┘
//!                            │
//!                            └──encode v──▶ EthereumSignature (r, s, v)
//! ```

use alloy::primitives::U256;

use crate::{
    constants::{
        DIGEST_LENGTH, LEGACY_V_OFFSET, PUBLIC_KEY_COORDINATES_LENGTH,
        SECP256K1_SIGNATURE_LENGTH, UNCOMPRESSED_POINT_LENGTH, UNCOMPRESSED_POINT_MARKER,
    },
    models::SignatureError,
};

/// The 32-byte pre-hashed payload the KMS signs.
pub type DigestMessage = [u8; DIGEST_LENGTH];

/// `(r, s)` exactly as decoded from the KMS DER signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSignature {
    pub r: U256,
    pub s: U256,
}

/// `(r, s)` with `s <= N/2`.
///
/// Only [`crate::utils::canonicalize`] builds this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalSignature {
    r: U256,
    s: U256,
}

impl CanonicalSignature {
    pub(crate) fn new_unchecked(r: U256, s: U256) -> Self {
        Self { r, s }
    }

    pub fn r(&self) -> U256 {
        self.r
    }

    pub fn s(&self) -> U256 {
        self.s
    }

    /// Fixed-width `r || s`.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        bytes[32..].copy_from_slice(&self.s.to_be_bytes::<32>());
        bytes
    }
}

impl From<CanonicalSignature> for RawSignature {
    fn from(sig: CanonicalSignature) -> Self {
        RawSignature { r: sig.r, s: sig.s }
    }
}

/// Which of the two candidate public keys a signature recovers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecoveryId(u8);

impl RecoveryId {
    pub const ZERO: RecoveryId = RecoveryId(0);
    pub const ONE: RecoveryId = RecoveryId(1);

    /// Candidates in the order they are tried during resolution.
    pub const CANDIDATES: [RecoveryId; 2] = [RecoveryId::ZERO, RecoveryId::ONE];

    pub fn to_byte(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = SignatureError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 | 1 => Ok(RecoveryId(value)),
            other => Err(SignatureError::InvalidV(other as u64)),
        }
    }
}

/// Uncompressed secp256k1 point without the `0x04` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKeyPoint {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

impl PublicKeyPoint {
    /// Parses a 65-byte SEC1 uncompressed point (`0x04 || x || y`).
    pub fn from_uncompressed(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != UNCOMPRESSED_POINT_LENGTH {
            return Err(SignatureError::MalformedPublicKey(format!(
                "Invalid uncompressed point length: expected {} bytes, got {}",
                UNCOMPRESSED_POINT_LENGTH,
                bytes.len()
            )));
        }
        if bytes[0] != UNCOMPRESSED_POINT_MARKER {
            return Err(SignatureError::MalformedPublicKey(format!(
                "Invalid point marker: expected 0x04, got 0x{:02x}",
                bytes[0]
            )));
        }

        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&bytes[1..33]);
        y.copy_from_slice(&bytes[33..]);
        Ok(Self { x, y })
    }

    /// Raw `x || y`, the Keccak-256 input for address derivation.
    pub fn coordinates(&self) -> [u8; PUBLIC_KEY_COORDINATES_LENGTH] {
        let mut out = [0u8; PUBLIC_KEY_COORDINATES_LENGTH];
        out[..32].copy_from_slice(&self.x);
        out[32..].copy_from_slice(&self.y);
        out
    }
}

/// The externally consumed `(r, s, v)` triple.
///
/// `v` is already chain-encoded (see [`crate::services::encode_v`]), so it may
/// exceed a byte for EIP-155 signatures on large chain ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthereumSignature {
    pub r: U256,
    pub s: U256,
    pub v: u64,
}

impl EthereumSignature {
    /// Serializes as 65 bytes `r || s || v`.
    ///
    /// Fails when `v` does not fit in a single byte (EIP-155 on chains above 110).
    pub fn to_bytes(&self) -> Result<[u8; SECP256K1_SIGNATURE_LENGTH], SignatureError> {
        let v = u8::try_from(self.v).map_err(|_| SignatureError::InvalidV(self.v))?;
        Ok(self.rsv(v))
    }

    /// Serializes a bare-id signature the way personal-message signatures are
    /// published: `r || s || (v + 27)`.
    pub fn to_personal_sign_bytes(&self) -> Result<[u8; SECP256K1_SIGNATURE_LENGTH], SignatureError> {
        if self.v > 1 {
            return Err(SignatureError::InvalidV(self.v));
        }
        Ok(self.rsv((self.v + LEGACY_V_OFFSET) as u8))
    }

    fn rsv(&self, v: u8) -> [u8; SECP256K1_SIGNATURE_LENGTH] {
        let mut out = [0u8; SECP256K1_SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        out[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        out[64] = v;
        out
    }
}
