use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::SyncEvent;
use crate::utils::{convert_token_to_decimal, safe_div};

/// Which slot of a pair a token occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSide {
    Token0,
    Token1,
}

impl TokenSide {
    pub fn opposite(self) -> Self {
        match self {
            TokenSide::Token0 => TokenSide::Token1,
            TokenSide::Token1 => TokenSide::Token0,
        }
    }
}

/// Trading pair metadata and current reserve state.
///
/// Primary Key: id (lowercase pair contract address)
///
/// Spot prices follow the Uniswap V2 convention:
/// - token0_price = reserve0 / reserve1 (token0 per 1 token1)
/// - token1_price = reserve1 / reserve0 (token1 per 1 token0)
///
/// so that `token0_price * reserve1 == reserve0` holds for any synced pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    // Primary key
    pub id: String,

    // Token pair
    pub token0: String,
    pub token1: String,

    // Pool balances (decimal-adjusted)
    #[serde(default)]
    pub reserve0: BigDecimal,
    #[serde(default)]
    pub reserve1: BigDecimal,

    // Pool value, maintained by the repricing pass
    #[serde(default)]
    pub reserve_native: BigDecimal,
    #[serde(default)]
    pub reserve_usd: BigDecimal,
    #[serde(default)]
    pub tracked_reserve_native: BigDecimal,

    // Spot prices implied by reserves
    #[serde(default)]
    pub token0_price: BigDecimal,
    #[serde(default)]
    pub token1_price: BigDecimal,

    #[serde(default)]
    pub liquidity_provider_count: u64,
}

impl Pair {
    pub fn new(id: &str, token0: &str, token1: &str) -> Self {
        Self {
            id: id.to_lowercase(),
            token0: token0.to_lowercase(),
            token1: token1.to_lowercase(),
            reserve0: BigDecimal::default(),
            reserve1: BigDecimal::default(),
            reserve_native: BigDecimal::default(),
            reserve_usd: BigDecimal::default(),
            tracked_reserve_native: BigDecimal::default(),
            token0_price: BigDecimal::default(),
            token1_price: BigDecimal::default(),
            liquidity_provider_count: 0,
        }
    }

    /// Builder variant of [`Pair::sync_reserves`].
    pub fn with_reserves(mut self, reserve0: BigDecimal, reserve1: BigDecimal) -> Self {
        self.sync_reserves(reserve0, reserve1);
        self
    }

    /// Apply new reserves (e.g. from a Sync event) and recompute spot prices.
    ///
    /// An empty side yields a zero price rather than a division by zero.
    pub fn sync_reserves(&mut self, reserve0: BigDecimal, reserve1: BigDecimal) {
        self.token0_price = safe_div(&reserve0, &reserve1);
        self.token1_price = safe_div(&reserve1, &reserve0);
        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
    }

    /// Update reserves from a raw Sync event.
    ///
    /// Raw amounts are converted with each token's decimals before the spot
    /// prices are recomputed.
    pub fn apply_sync(&mut self, event: &SyncEvent, decimals0: u8, decimals1: u8) -> Result<()> {
        let reserve0 = convert_token_to_decimal(&event.reserve0, decimals0)
            .with_context(|| format!("Invalid reserve0 '{}' for pair {}", event.reserve0, self.id))?;
        let reserve1 = convert_token_to_decimal(&event.reserve1, decimals1)
            .with_context(|| format!("Invalid reserve1 '{}' for pair {}", event.reserve1, self.id))?;

        self.sync_reserves(reserve0, reserve1);
        Ok(())
    }

    /// Which side `token` sits on, if it belongs to this pair.
    pub fn side_of(&self, token: &str) -> Option<TokenSide> {
        if self.token0.eq_ignore_ascii_case(token) {
            Some(TokenSide::Token0)
        } else if self.token1.eq_ignore_ascii_case(token) {
            Some(TokenSide::Token1)
        } else {
            None
        }
    }

    pub fn token(&self, side: TokenSide) -> &str {
        match side {
            TokenSide::Token0 => &self.token0,
            TokenSide::Token1 => &self.token1,
        }
    }

    pub fn reserve(&self, side: TokenSide) -> &BigDecimal {
        match side {
            TokenSide::Token0 => &self.reserve0,
            TokenSide::Token1 => &self.reserve1,
        }
    }

    /// Units of the opposite token that one unit of the `side` token is worth.
    ///
    /// - Token0 → token1_price (token1 per token0)
    /// - Token1 → token0_price (token0 per token1)
    pub fn spot_rate(&self, side: TokenSide) -> &BigDecimal {
        match side {
            TokenSide::Token0 => &self.token1_price,
            TokenSide::Token1 => &self.token0_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_sync_reserves_keeps_price_invariant() {
        let pair = Pair::new("0xPAIR", "0xA", "0xB").with_reserves(dec("240"), dec("60"));

        assert_eq!(pair.token0_price, dec("4"));
        assert_eq!(pair.token1_price, dec("0.25"));
        assert_eq!(&pair.token0_price * &pair.reserve1, pair.reserve0);
        assert_eq!(&pair.token1_price * &pair.reserve0, pair.reserve1);
    }

    #[test]
    fn test_sync_reserves_empty_side_is_zero_price() {
        let pair = Pair::new("0xpair", "0xa", "0xb").with_reserves(dec("10"), BigDecimal::zero());

        assert!(pair.token0_price.is_zero());
        assert!(pair.token1_price.is_zero());
    }

    #[test]
    fn test_apply_sync_scales_by_decimals() {
        let mut pair = Pair::new("0xpair", "0xa", "0xb");
        let event = SyncEvent::new("0xpair", "30000000000000000000", "60000000");

        pair.apply_sync(&event, 18, 6).unwrap();

        assert_eq!(pair.reserve0, dec("30"));
        assert_eq!(pair.reserve1, dec("60"));
        assert_eq!(pair.token1_price, dec("2"));
    }

    #[test]
    fn test_apply_sync_rejects_non_integer_reserve() {
        let mut pair = Pair::new("0xpair", "0xa", "0xb").with_reserves(dec("1"), dec("1"));
        let event = SyncEvent::new("0xpair", "1.5", "10");

        assert!(pair.apply_sync(&event, 18, 18).is_err());
        // untouched on failure
        assert_eq!(pair.reserve0, dec("1"));
    }

    #[test]
    fn test_apply_sync_rejects_negative_reserve() {
        let mut pair = Pair::new("0xpair", "0xa", "0xb").with_reserves(dec("1"), dec("1"));
        let event = SyncEvent::new("0xpair", "1000", "-1000");

        assert!(pair.apply_sync(&event, 0, 0).is_err());
        assert_eq!(pair.reserve1, dec("1"));
    }

    #[test]
    fn test_side_lookup_is_case_insensitive() {
        let pair = Pair::new("0xpair", "0xAbC", "0xdef");

        assert_eq!(pair.id, "0xpair");
        assert_eq!(pair.side_of("0xabc"), Some(TokenSide::Token0));
        assert_eq!(pair.side_of("0xDEF"), Some(TokenSide::Token1));
        assert_eq!(pair.side_of("0x123"), None);
        assert_eq!(pair.token(TokenSide::Token0.opposite()), "0xdef");
    }

    #[test]
    fn test_spot_rate_direction() {
        // 100 token0 vs 50 token1: one token0 buys 0.5 token1
        let pair = Pair::new("0xpair", "0xa", "0xb").with_reserves(dec("100"), dec("50"));

        assert_eq!(pair.spot_rate(TokenSide::Token0), &dec("0.5"));
        assert_eq!(pair.spot_rate(TokenSide::Token1), &dec("2"));
    }
}
