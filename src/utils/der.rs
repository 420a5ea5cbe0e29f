//! Decoders for the two fixed DER structures returned by a KMS.
//!
//! ```text
//! Ecdsa-Sig-Value ::= SEQUENCE { r INTEGER, s INTEGER }
//!
//! SubjectPublicKeyInfo ::= SEQUENCE {
//!     algorithm  SEQUENCE { id-ecPublicKey OID, secp256k1 OID },
//!     publicKey  BIT STRING  -- 0x04 || x || y
//! }
//! ```
//!
//! TLV parsing is delegated to `simple_asn1`, which also accepts BER forms
//! (long-form lengths, padded integers). Input is therefore re-encoded and
//! must match the original bytes before the fixed-schema checks run.

use alloy::primitives::U256;
use simple_asn1::{to_der, ASN1Block};

use crate::{
    constants::{SECP256K1_N, UNCOMPRESSED_POINT_LENGTH},
    models::{PublicKeyPoint, RawSignature, SignatureError},
};

/// Decodes a DER `SEQUENCE { INTEGER r, INTEGER s }` into a [`RawSignature`].
///
/// Both integers must lie in `1..N`.
pub fn decode_signature(der: &[u8]) -> Result<RawSignature, SignatureError> {
    let blocks = simple_asn1::from_der(der)
        .map_err(|e| SignatureError::MalformedSignature(format!("ASN.1 parse error: {e}")))?;

    let fields = match blocks.as_slice() {
        [block @ ASN1Block::Sequence(_, fields)] => {
            if !is_canonical(block, der) {
                return Err(SignatureError::MalformedSignature(
                    "Non-canonical DER encoding".to_string(),
                ));
            }
            fields
        }
        [_] => {
            return Err(SignatureError::MalformedSignature(
                "Outer element is not a SEQUENCE".to_string(),
            ))
        }
        _ => {
            return Err(SignatureError::MalformedSignature(format!(
                "Expected exactly one top-level element, got {}",
                blocks.len()
            )))
        }
    };

    match fields.as_slice() {
        [r, s] => Ok(RawSignature {
            r: decode_scalar(r, "r")?,
            s: decode_scalar(s, "s")?,
        }),
        _ => Err(SignatureError::MalformedSignature(format!(
            "Expected 2 INTEGER fields, got {}",
            fields.len()
        ))),
    }
}

/// Whether `der` is exactly the DER encoding of `block`.
fn is_canonical(block: &ASN1Block, der: &[u8]) -> bool {
    to_der(block).is_ok_and(|encoded| encoded == der)
}

fn decode_scalar(block: &ASN1Block, name: &str) -> Result<U256, SignatureError> {
    let ASN1Block::Integer(_, value) = block else {
        return Err(SignatureError::MalformedSignature(format!(
            "Field {name} is not an INTEGER"
        )));
    };

    // Negative values only appear when the sign-padding byte is missing.
    let magnitude = value.to_biguint().ok_or_else(|| {
        SignatureError::MalformedSignature(format!("Field {name} is negative"))
    })?;

    let scalar = U256::try_from_be_slice(&magnitude.to_bytes_be()).ok_or_else(|| {
        SignatureError::MalformedSignature(format!("Field {name} is wider than 256 bits"))
    })?;

    if scalar.is_zero() {
        return Err(SignatureError::MalformedSignature(format!(
            "Field {name} is zero"
        )));
    }
    if scalar >= SECP256K1_N {
        return Err(SignatureError::MalformedSignature(format!(
            "Field {name} is not below the curve order"
        )));
    }

    Ok(scalar)
}

/// Decodes a DER SubjectPublicKeyInfo into the uncompressed point it wraps.
///
/// The algorithm identifier is checked structurally only. The bit string must
/// carry exactly `0x04 || x || y` with no unused bits.
pub fn decode_public_key(der: &[u8]) -> Result<PublicKeyPoint, SignatureError> {
    let blocks = simple_asn1::from_der(der)
        .map_err(|e| SignatureError::MalformedPublicKey(format!("ASN.1 parse error: {e}")))?;

    let fields = match blocks.as_slice() {
        [block @ ASN1Block::Sequence(_, fields)] => {
            if !is_canonical(block, der) {
                return Err(SignatureError::MalformedPublicKey(
                    "Non-canonical DER encoding".to_string(),
                ));
            }
            fields
        }
        _ => {
            return Err(SignatureError::MalformedPublicKey(
                "Invalid ASN.1 structure for public key".to_string(),
            ))
        }
    };

    let (algorithm, bit_string) = match fields.as_slice() {
        [algorithm, bit_string] => (algorithm, bit_string),
        _ => {
            return Err(SignatureError::MalformedPublicKey(format!(
                "Expected algorithm identifier and BIT STRING, got {} fields",
                fields.len()
            )))
        }
    };

    match algorithm {
        ASN1Block::Sequence(_, ids)
            if ids.len() == 2
                && ids
                    .iter()
                    .all(|id| matches!(id, ASN1Block::ObjectIdentifier(_, _))) => {}
        _ => {
            return Err(SignatureError::MalformedPublicKey(
                "Invalid algorithm identifier".to_string(),
            ))
        }
    }

    let ASN1Block::BitString(_, bit_len, bytes) = bit_string else {
        return Err(SignatureError::MalformedPublicKey(
            "Public key is not a BIT STRING".to_string(),
        ));
    };

    if *bit_len != bytes.len() * 8 {
        return Err(SignatureError::MalformedPublicKey(
            "Public key BIT STRING has unused bits".to_string(),
        ));
    }
    if bytes.len() != UNCOMPRESSED_POINT_LENGTH {
        return Err(SignatureError::MalformedPublicKey(format!(
            "Invalid public key length: expected {} bytes, got {}",
            UNCOMPRESSED_POINT_LENGTH,
            bytes.len()
        )));
    }

    PublicKeyPoint::from_uncompressed(bytes)
}
