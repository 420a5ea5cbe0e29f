/// Selects how a recovery id is encoded into the wire-level `v`.
///
/// The caller picks the variant from the artifact being produced. Picking the
/// wrong one yields a well-formed signature that no node will accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainContext {
    /// Pre-replay-protection legacy transactions: `v = id + 27`.
    Legacy,
    /// EIP-155 legacy transactions: `v = id + chain_id * 2 + 35`.
    Eip155 { chain_id: u64 },
    /// Typed transactions (EIP-2930, EIP-1559) and personal messages: `v = id`.
    Typed,
}

impl ChainContext {
    /// Context for a legacy-shaped transaction, replay protected when a chain id is known.
    pub fn legacy(chain_id: Option<u64>) -> Self {
        match chain_id {
            Some(chain_id) => ChainContext::Eip155 { chain_id },
            None => ChainContext::Legacy,
        }
    }
}
