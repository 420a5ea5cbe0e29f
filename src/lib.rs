//! Ethereum signing with secp256k1 keys held in AWS KMS.
//!
//! KMS returns DER-encoded ECDSA signatures with no recovery id and no
//! low-s guarantee. This crate turns them into canonical, recoverable
//! `(r, s, v)` signatures for legacy, EIP-155 and typed transactions as well
//! as EIP-191 personal messages.
//!
//! ```text
//! KMS Sign (DER) -> decode -> canonicalize -> resolve recovery id -> encode v
//! ```
//!
//! Start from [`services::EvmKmsSigner`] or, for the pure adaptation step,
//! [`services::adapt_der_signature`].

pub mod config;
pub mod constants;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
