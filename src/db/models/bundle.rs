use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::constants::BUNDLE_ID;

/// Singleton holding the current USD price of the native asset.
///
/// Created once at genesis by the ingestion layer and overwritten each time
/// the native price is recomputed. Always stored under [`BUNDLE_ID`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default = "default_bundle_id")]
    pub id: String,
    #[serde(default)]
    pub native_price: BigDecimal,
}

fn default_bundle_id() -> String {
    BUNDLE_ID.to_string()
}

impl Bundle {
    pub fn new(native_price: BigDecimal) -> Self {
        Self {
            id: default_bundle_id(),
            native_price,
        }
    }
}
