use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Token metadata and its derived price state.
///
/// Primary Key: id (lowercase contract address)
/// `derived_native` is the token's price in native-asset units as of the last
/// repricing; it may be stale between updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    // Primary key
    pub id: String,

    // On-chain metadata (immutable after first fetch)
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    // Current price state
    #[serde(default)]
    pub derived_native: BigDecimal,
}

fn default_decimals() -> u8 {
    18
}

impl Token {
    pub fn new(id: &str, symbol: &str, name: &str, decimals: u8) -> Self {
        Self {
            // Always lowercase addresses for consistent comparisons
            id: id.to_lowercase(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            derived_native: BigDecimal::default(),
        }
    }

    pub fn with_derived_native(mut self, derived_native: BigDecimal) -> Self {
        self.derived_native = derived_native;
        self
    }
}
