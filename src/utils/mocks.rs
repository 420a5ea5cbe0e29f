//! Test fixtures shared across unit tests: fixed keys and hand-built DER.

use alloy::primitives::{keccak256, Address, U256};
use k256::{ecdsa::SigningKey, pkcs8::EncodePublicKey};

use crate::constants::SECP256K1_N;

pub const VALID_SECP256K1_PEM: &str = "-----BEGIN PUBLIC KEY-----\nMFYwEAYHKoZIzj0CAQYFK4EEAAoDQgAEjJaJh5wfZwvj8b3bQ4GYikqDTLXWUjMh\nkFs9lGj2N9B17zo37p4PSy99rDio0QHLadpso0rtTJDSISRW9MdOqA==\n-----END PUBLIC KEY-----\n"; // noboost

/// Address of the key in [`VALID_SECP256K1_PEM`].
pub const VALID_SECP256K1_ADDRESS: &str = "0xeeb8861f51b3f3f2204d64bbf7a7eb25e1b4d6cd";

pub fn test_signing_key() -> SigningKey {
    SigningKey::from_slice(&[0x11; 32]).unwrap()
}

pub fn other_signing_key() -> SigningKey {
    SigningKey::from_slice(&[0x22; 32]).unwrap()
}

pub fn test_public_key_der(key: &SigningKey) -> Vec<u8> {
    key.verifying_key()
        .to_public_key_der()
        .unwrap()
        .as_bytes()
        .to_vec()
}

/// Address computed straight from k256, independent of the DER codec.
pub fn test_address(key: &SigningKey) -> Address {
    let point = key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// DER signature as a KMS would return it (k256 emits low-S).
pub fn sign_der(key: &SigningKey, digest: &[u8; 32]) -> Vec<u8> {
    let (signature, _) = key.sign_prehash_recoverable(digest).unwrap();
    signature.to_der().as_bytes().to_vec()
}

/// Same signature as [`sign_der`] with `s` replaced by `N - s`.
pub fn sign_der_high_s(key: &SigningKey, digest: &[u8; 32]) -> Vec<u8> {
    let (signature, _) = key.sign_prehash_recoverable(digest).unwrap();
    let bytes = signature.to_bytes();
    let r = U256::from_be_slice(&bytes[..32]);
    let s = U256::from_be_slice(&bytes[32..]);
    der_signature(r, SECP256K1_N - s)
}

pub fn der_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else {
        vec![0x81, len as u8]
    }
}

/// Minimal DER INTEGER for a non-negative big-endian value.
pub fn der_integer(value: &[u8]) -> Vec<u8> {
    let first = value.iter().position(|b| *b != 0).unwrap_or(value.len() - 1);
    let mut content = value[first..].to_vec();
    if content[0] & 0x80 != 0 {
        content.insert(0, 0x00);
    }

    let mut out = vec![0x02];
    out.extend(der_length(content.len()));
    out.extend(content);
    out
}

pub fn der_sequence(parts: &[Vec<u8>]) -> Vec<u8> {
    let content: Vec<u8> = parts.concat();
    let mut out = vec![0x30];
    out.extend(der_length(content.len()));
    out.extend(content);
    out
}

pub fn der_bit_string(content: &[u8]) -> Vec<u8> {
    let mut out = vec![0x03];
    out.extend(der_length(content.len() + 1));
    out.push(0x00);
    out.extend_from_slice(content);
    out
}

/// `SEQUENCE { id-ecPublicKey, secp256k1 }`
pub fn spki_algorithm() -> Vec<u8> {
    der_sequence(&[
        vec![0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01],
        vec![0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a],
    ])
}

pub fn der_signature(r: U256, s: U256) -> Vec<u8> {
    der_sequence(&[
        der_integer(&r.to_be_bytes::<32>()),
        der_integer(&s.to_be_bytes::<32>()),
    ])
}
