//! secp256k1 curve constants

use alloy::primitives::{uint, U256};

/// Order `N` of the secp256k1 group.
pub const SECP256K1_N: U256 =
    uint!(0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141_U256);

/// `N / 2` (floor). Signatures with `s` above this bound are high-S.
pub const SECP256K1_HALF_N: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

/// Tag byte of an uncompressed SEC1 point.
pub const UNCOMPRESSED_POINT_MARKER: u8 = 0x04;

/// Length of an uncompressed point including the marker byte.
pub const UNCOMPRESSED_POINT_LENGTH: usize = 65;

/// Length of the raw `x || y` coordinates.
pub const PUBLIC_KEY_COORDINATES_LENGTH: usize = 64;
