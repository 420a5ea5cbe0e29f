mod error;
pub use error::*;

mod signature;
pub use signature::*;

mod chain_context;
pub use chain_context::*;
