use serde::{Deserialize, Serialize};

/// Raw V2 `Sync(uint112 reserve0, uint112 reserve1)` emitted by a pair.
///
/// Reserves are base-10 integer strings exactly as on-chain; they are scaled
/// by each token's decimals when applied to the pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEvent {
    pub pair: String,
    pub reserve0: String,
    pub reserve1: String,
}

impl SyncEvent {
    pub fn new(pair: &str, reserve0: &str, reserve1: &str) -> Self {
        Self {
            pair: pair.to_lowercase(),
            reserve0: reserve0.to_string(),
            reserve1: reserve1.to_string(),
        }
    }
}
