mod logging;
pub use logging::*;

mod secp256k1;
pub use secp256k1::*;

mod evm_signature;
pub use evm_signature::*;
