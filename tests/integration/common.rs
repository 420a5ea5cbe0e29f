//! In-process stand-in for AWS KMS.

use std::collections::HashMap;

use alloy::primitives::{keccak256, Address, U256};
use async_trait::async_trait;
use evm_kms_signer::{
    constants::SECP256K1_N,
    services::{AwsKmsError, AwsKmsK256, AwsKmsResult},
};
use k256::{
    ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey},
    pkcs8::EncodePublicKey,
};

/// Key store keyed by KMS key id.
///
/// With `high_s` set, every signature is returned in its non-canonical form,
/// which AWS KMS is free to do.
pub struct LocalKms {
    keys: HashMap<String, SigningKey>,
    high_s: bool,
}

impl LocalKms {
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
            high_s: false,
        }
    }

    pub fn with_key(mut self, key_id: &str, secret: [u8; 32]) -> Self {
        let key = SigningKey::from_slice(&secret).unwrap();
        self.keys.insert(key_id.to_string(), key);
        self
    }

    pub fn with_high_s(mut self) -> Self {
        self.high_s = true;
        self
    }

    pub fn address_of(&self, key_id: &str) -> Address {
        address_of_key(self.keys[key_id].verifying_key())
    }

    fn key(&self, key_id: &str) -> AwsKmsResult<&SigningKey> {
        self.keys
            .get(key_id)
            .ok_or_else(|| AwsKmsError::KeyNotFound(format!("Key '{key_id}' does not exist")))
    }
}

#[async_trait]
impl AwsKmsK256 for LocalKms {
    async fn get_der_public_key<'a, 'b>(&'a self, key_id: &'b str) -> AwsKmsResult<Vec<u8>> {
        let key = self.key(key_id)?;
        let der = key
            .verifying_key()
            .to_public_key_der()
            .map_err(|e| AwsKmsError::GetError(e.to_string()))?;
        Ok(der.as_bytes().to_vec())
    }

    async fn sign_digest<'a, 'b>(
        &'a self,
        key_id: &'b str,
        digest: [u8; 32],
    ) -> AwsKmsResult<Vec<u8>> {
        let key = self.key(key_id)?;
        let (signature, _) = key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| AwsKmsError::SignError(e.to_string()))?;

        if !self.high_s {
            return Ok(signature.to_der().as_bytes().to_vec());
        }

        let bytes = signature.to_bytes();
        let s = SECP256K1_N - U256::from_be_slice(&bytes[32..]);
        Ok(encode_der_signature(&bytes[..32], &s.to_be_bytes::<32>()))
    }
}

pub fn address_of_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recovers the signer of a prehash from `r || s` and a bare parity.
pub fn recover_signer(digest: &[u8; 32], rs: &[u8], parity: u8) -> Address {
    let signature = Signature::from_slice(rs).unwrap();
    let recovery_id = RecoveryId::from_byte(parity).unwrap();
    let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id).unwrap();
    address_of_key(&key)
}

fn encode_der_signature(r: &[u8], s: &[u8]) -> Vec<u8> {
    let integer = |value: &[u8]| {
        let start = value.iter().position(|b| *b != 0).unwrap_or(value.len() - 1);
        let mut content = value[start..].to_vec();
        if content[0] & 0x80 != 0 {
            content.insert(0, 0);
        }
        let mut out = vec![0x02, content.len() as u8];
        out.extend(content);
        out
    };

    let body = [integer(r), integer(s)].concat();
    let mut out = vec![0x30, body.len() as u8];
    out.extend(body);
    out
}
