use alloy::primitives::Address;
use k256::ecdsa::{RecoveryId as K256RecoveryId, Signature, VerifyingKey};
use log::{debug, warn};

use crate::{
    constants::{SECP256K1_HALF_N, SECP256K1_N},
    models::{
        CanonicalSignature, DigestMessage, PublicKeyPoint, RawSignature, RecoveryId,
        SignatureError,
    },
    utils::{derive_address, format_address},
};

/// Enforces the low-S form Ethereum requires (EIP-2).
///
/// `s` is replaced by `N - s` when it exceeds `N/2`; `r` is never touched.
/// Flipping `s` also flips which recovery id is correct, so this has to run
/// before [`resolve_recovery_id`].
pub fn canonicalize(sig: RawSignature) -> CanonicalSignature {
    let s = if sig.s > SECP256K1_HALF_N {
        SECP256K1_N - sig.s
    } else {
        sig.s
    };
    CanonicalSignature::new_unchecked(sig.r, s)
}

/// Recovers the signer address for one recovery id candidate.
///
/// Returns `None` when the candidate does not yield a valid point.
pub fn recover_address(
    digest: &DigestMessage,
    sig: &CanonicalSignature,
    candidate: RecoveryId,
) -> Option<Address> {
    let signature = Signature::from_slice(&sig.to_bytes()).ok()?;
    let rec_id = K256RecoveryId::from_byte(candidate.to_byte())?;

    let key = VerifyingKey::recover_from_prehash(digest, &signature, rec_id).ok()?;
    let encoded = key.to_encoded_point(false);
    let point = PublicKeyPoint::from_uncompressed(encoded.as_bytes()).ok()?;
    Some(derive_address(&point))
}

/// Finds the recovery id under which `sig` recovers to `expected_address`.
///
/// Candidates are tried in the order 0, 1 and the first match wins. When
/// neither matches the digest, the signature, or the expected address is
/// wrong; there is no fallback to an unverified candidate.
pub fn resolve_recovery_id(
    digest: &DigestMessage,
    sig: &CanonicalSignature,
    expected_address: &Address,
) -> Result<RecoveryId, SignatureError> {
    for candidate in RecoveryId::CANDIDATES {
        match recover_address(digest, sig, candidate) {
            Some(recovered) if recovered == *expected_address => {
                debug!(
                    "Recovery id {} matches {}",
                    candidate.to_byte(),
                    format_address(expected_address)
                );
                return Ok(candidate);
            }
            Some(recovered) => debug!(
                "Recovery id {} recovers {}, expected {}",
                candidate.to_byte(),
                format_address(&recovered),
                format_address(expected_address)
            ),
            None => debug!("Recovery id {} yields no public key", candidate.to_byte()),
        }
    }

    warn!(
        "No recovery id recovers the expected signer {}",
        format_address(expected_address)
    );
    Err(SignatureError::RecoveryMismatch(format!(
        "Failed to recover v value: no valid recovery ID found for expected address {}. \
         This usually indicates a signature/public key mismatch, tried recovery IDs: 0, 1",
        format_address(expected_address)
    )))
}
