use alloy::primitives::{eip191_hash_message, keccak256, Address};
use evm_kms_signer::{
    config::KmsSignerConfig,
    constants::SECP256K1_HALF_N,
    models::{ChainContext, SignatureError},
    services::{create_signature, AwsKmsError, EvmKmsSigner, Signer},
};

use super::common::{recover_signer, LocalKms};

const KEY_ID: &str = "alias/integration";

fn signer() -> EvmKmsSigner<LocalKms> {
    EvmKmsSigner::new(KEY_ID, LocalKms::new().with_key(KEY_ID, [0x33; 32]))
}

#[tokio::test]
async fn test_typed_and_legacy_payloads_recover_to_signer() {
    let kms = LocalKms::new().with_key(KEY_ID, [0x33; 32]);
    let expected = kms.address_of(KEY_ID);
    let signer = EvmKmsSigner::new(KEY_ID, kms);
    let mut config = KmsSignerConfig::new(KEY_ID);
    config.chain_id = Some(1337);

    let payload = b"\x02unsigned eip-1559 transaction";
    let digest = keccak256(payload).0;

    let typed = signer
        .sign_payload(payload, config.chain_context(true))
        .await
        .unwrap();
    assert!(typed.v <= 1);
    let rs = typed.to_bytes().unwrap();
    assert_eq!(recover_signer(&digest, &rs[..64], typed.v as u8), expected);

    let legacy = signer
        .sign_payload(payload, config.chain_context(false))
        .await
        .unwrap();
    assert_eq!(legacy.v, typed.v + 2709);
    assert_eq!((legacy.r, legacy.s), (typed.r, typed.s));
}

#[tokio::test]
async fn test_high_s_kms_output_is_canonicalized() {
    let canonical_kms = LocalKms::new().with_key(KEY_ID, [0x44; 32]);
    let expected = canonical_kms.address_of(KEY_ID);
    let high_s_kms = LocalKms::new().with_key(KEY_ID, [0x44; 32]).with_high_s();
    let digest = [0xAA; 32];
    let context = ChainContext::Eip155 { chain_id: 1 };

    let from_canonical = create_signature(&canonical_kms, KEY_ID, &digest, &expected, context)
        .await
        .unwrap();
    let from_high_s = create_signature(&high_s_kms, KEY_ID, &digest, &expected, context)
        .await
        .unwrap();

    assert!(from_high_s.s <= SECP256K1_HALF_N);
    assert_eq!(from_canonical, from_high_s);
    assert!(from_high_s.v == 37 || from_high_s.v == 38);
}

#[tokio::test]
async fn test_personal_message_signature() {
    let signer = signer();
    let address = signer.address().await.unwrap();
    let message = "Sign in to example.org";

    let signature = signer
        .sign_message_from(&address, message)
        .await
        .unwrap();
    assert!(signature[64] == 27 || signature[64] == 28);

    let digest = eip191_hash_message(message).0;
    assert_eq!(
        recover_signer(&digest, &signature[..64], signature[64] - 27),
        address
    );
}

#[tokio::test]
async fn test_signer_for_unknown_key_fails_permanently() {
    let signer = EvmKmsSigner::new("alias/missing", LocalKms::new());

    let error = signer.address().await.unwrap_err();
    assert!(matches!(
        error,
        SignatureError::UpstreamSigningError(AwsKmsError::KeyNotFound(_))
    ));
    assert!(!error.is_transient());

    let error = create_signature(
        &LocalKms::new(),
        "alias/missing",
        &[0x01; 32],
        &Address::ZERO,
        ChainContext::Typed,
    )
    .await
    .unwrap_err();
    assert!(!error.is_transient());
}

#[tokio::test]
async fn test_signature_from_another_key_is_rejected() {
    let kms = LocalKms::new()
        .with_key(KEY_ID, [0x33; 32])
        .with_key("alias/other", [0x55; 32]);
    let other = kms.address_of("alias/other");

    let result = create_signature(&kms, KEY_ID, &[0x01; 32], &other, ChainContext::Typed).await;
    assert!(matches!(result, Err(SignatureError::RecoveryMismatch(_))));
}

#[tokio::test]
async fn test_large_chain_id_needs_wide_v() {
    let signer = signer();
    let chain_id = 11_155_111;

    let signature = signer
        .sign_digest([0x0F; 32], ChainContext::Eip155 { chain_id })
        .await
        .unwrap();
    assert!(signature.v >= chain_id * 2 + 35);
    assert!(matches!(
        signature.to_bytes(),
        Err(SignatureError::InvalidV(_))
    ));

    let overflow = signer
        .sign_digest([0x0F; 32], ChainContext::Eip155 { chain_id: u64::MAX })
        .await;
    assert!(matches!(
        overflow,
        Err(SignatureError::InvalidChainId(u64::MAX))
    ));
}
