//! Trusted USD volume and liquidity attribution.
//!
//! Only amounts of whitelisted tokens are trusted. USD value of an amount is
//! `amount * token.derived_native * bundle.native_price`.

use bigdecimal::BigDecimal;
use num_traits::Zero;

use super::PriceResolver;
use crate::{
    db::{
        models::{Pair, Token},
        EntityStore,
    },
    utils::safe_div,
};

/// Which tokens of a pair are on the whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistCoverage {
    Both,
    Token0Only,
    Token1Only,
    Neither,
}

impl WhitelistCoverage {
    pub fn new(token0_whitelisted: bool, token1_whitelisted: bool) -> Self {
        match (token0_whitelisted, token1_whitelisted) {
            (true, true) => WhitelistCoverage::Both,
            (true, false) => WhitelistCoverage::Token0Only,
            (false, true) => WhitelistCoverage::Token1Only,
            (false, false) => WhitelistCoverage::Neither,
        }
    }
}

fn two() -> BigDecimal {
    BigDecimal::from(2)
}

impl<S: EntityStore, F> PriceResolver<'_, S, F> {
    fn coverage(&self, token0: &Token, token1: &Token) -> WhitelistCoverage {
        WhitelistCoverage::new(self.is_whitelisted(token0), self.is_whitelisted(token1))
    }

    /// USD amount of a swap that counts toward tracked volume.
    ///
    /// Pools with fewer than `lp_maturity_cutoff` liquidity providers must
    /// first hold `minimum_usd_threshold_new_pairs` of whitelisted value
    /// (one whitelisted side counts double), otherwise nothing is tracked.
    ///
    /// Then:
    /// - both whitelisted → average of the two legs
    /// - one whitelisted → that leg's full value
    /// - neither → 0
    pub fn tracked_volume_usd(
        &self,
        amount0: &BigDecimal,
        token0: &Token,
        amount1: &BigDecimal,
        token1: &Token,
        pair: &Pair,
    ) -> BigDecimal {
        let native_price = self.bundle_native_price();
        let price0 = Self::usd_price(token0, &native_price);
        let price1 = Self::usd_price(token1, &native_price);
        let coverage = self.coverage(token0, token1);

        // if less than 5 LPs, require high minimum reserve amount or return 0
        if pair.liquidity_provider_count < self.settings.lp_maturity_cutoff {
            let reserve0_usd = &pair.reserve0 * &price0;
            let reserve1_usd = &pair.reserve1 * &price1;

            let pool_usd = match coverage {
                WhitelistCoverage::Both => Some(reserve0_usd + reserve1_usd),
                WhitelistCoverage::Token0Only => Some(reserve0_usd * two()),
                WhitelistCoverage::Token1Only => Some(reserve1_usd * two()),
                WhitelistCoverage::Neither => None,
            };

            if let Some(pool_usd) = pool_usd {
                if pool_usd < self.settings.minimum_usd_threshold_new_pairs {
                    return BigDecimal::zero();
                }
            }
        }

        match coverage {
            WhitelistCoverage::Both => (amount0 * &price0 + amount1 * &price1) / two(),
            WhitelistCoverage::Token0Only => amount0 * &price0,
            WhitelistCoverage::Token1Only => amount1 * &price1,
            WhitelistCoverage::Neither => BigDecimal::zero(),
        }
    }

    /// USD value of a mint/burn that counts toward tracked liquidity.
    ///
    /// - both whitelisted → sum of both legs
    /// - one whitelisted → double that leg (balanced reserves)
    /// - neither → 0
    pub fn tracked_liquidity_usd(
        &self,
        amount0: &BigDecimal,
        token0: &Token,
        amount1: &BigDecimal,
        token1: &Token,
    ) -> BigDecimal {
        let native_price = self.bundle_native_price();
        let price0 = Self::usd_price(token0, &native_price);
        let price1 = Self::usd_price(token1, &native_price);

        match self.coverage(token0, token1) {
            WhitelistCoverage::Both => amount0 * &price0 + amount1 * &price1,
            WhitelistCoverage::Token0Only => amount0 * &price0 * two(),
            WhitelistCoverage::Token1Only => amount1 * &price1 * two(),
            WhitelistCoverage::Neither => BigDecimal::zero(),
        }
    }

    /// Tracked liquidity of a pair's full reserves, in native units.
    ///
    /// Zero when either token is unknown or the native price is not set.
    pub fn tracked_reserve_native(&self, pair: &Pair) -> BigDecimal {
        let (Some(token0), Some(token1)) = (
            self.store.load_token(&pair.token0),
            self.store.load_token(&pair.token1),
        ) else {
            return BigDecimal::zero();
        };

        let tracked_usd =
            self.tracked_liquidity_usd(&pair.reserve0, &token0, &pair.reserve1, &token1);
        safe_div(&tracked_usd, &self.bundle_native_price())
    }
}
