//! Token price in native-asset units.
//!
//! Greedy single-hop search: walk the whitelist in order and take the first
//! anchor whose pair with the token clears the native liquidity floor. This
//! is deliberately not a best-liquidity or multi-hop search; downstream
//! consumers depend on the exact values this ordering produces.

use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use log::{debug, warn};
use num_traits::{One, Zero};

use super::PriceResolver;
use crate::{
    db::{models::Token, EntityStore},
    factory::PairFactory,
    utils::{address_id, parse_address},
};

impl<S: EntityStore, F: PairFactory> PriceResolver<'_, S, F> {
    /// Derive `token`'s price in native units.
    ///
    /// Resolution:
    /// 1. Wrapped native → exactly 1
    /// 2. First whitelist anchor with a pair whose `reserve_native` exceeds the
    ///    floor → spot rate (anchor per token) × anchor's derived native price
    /// 3. Nothing qualifies → 0 (untracked)
    ///
    /// Thin pairs, and pairs or anchor tokens missing from the store, are
    /// skipped rather than ending the search.
    pub fn derived_native(&self, token: &Token) -> Result<BigDecimal> {
        if self.settings.is_native(&token.id) {
            return Ok(BigDecimal::one());
        }

        let token_address = parse_address(&token.id)?;

        for anchor in self.settings.whitelist.iter() {
            let anchor_address = parse_address(anchor)?;
            let pair_address = self
                .factory
                .get_pair(token_address, anchor_address)
                .with_context(|| format!("getPair({}, {}) failed", token.id, anchor))?;

            if pair_address.is_zero() {
                continue;
            }

            let pair_id = address_id(&pair_address);
            let Some(pair) = self.store.load_pair(&pair_id) else {
                warn!("Factory returned pair {} for {} but it is not stored", pair_id, token.id);
                continue;
            };

            let Some(side) = pair.side_of(&token.id) else {
                warn!("Pair {} does not contain token {}", pair_id, token.id);
                continue;
            };

            if pair.reserve_native <= self.settings.minimum_liquidity_threshold_native {
                debug!(
                    "Pair {} below native liquidity floor ({}), trying next anchor",
                    pair_id, pair.reserve_native
                );
                continue;
            }

            let paired_id = pair.token(side.opposite());
            let Some(paired) = self.store.load_token(paired_id) else {
                warn!("Anchor token {} of pair {} is not stored", paired_id, pair_id);
                continue;
            };

            // anchor per token * native per anchor
            return Ok(pair.spot_rate(side) * &paired.derived_native);
        }

        Ok(BigDecimal::zero())
    }
}
