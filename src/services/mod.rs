//! # Services Module
//!
//! Remote signing service integration and the signers built on top of it.

mod aws_kms;
pub use aws_kms::*;

mod signer;
pub use signer::*;
