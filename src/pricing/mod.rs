//! Price derivation and tracked-value attribution.
//!
//! Three cooperating algorithms, all pure reads over an injected
//! [`EntityStore`] (and, for token resolution, a [`PairFactory`]):
//!
//! - [`native_price`] - native asset USD price from the designated stablecoin pairs
//! - [`derived_native`] - a token's price in native units via the first liquid anchor
//! - [`tracked`] - how much swap volume / liquidity counts as trusted USD
//!
//! None of them write state; the caller persists whatever it keeps.

use bigdecimal::BigDecimal;
use log::warn;
use num_traits::Zero;

use crate::{
    config::PricingSettings,
    constants::BUNDLE_ID,
    db::{models::Token, EntityStore},
};

pub mod derived_native;
pub mod native_price;
pub mod tracked;
mod whitelist;

#[cfg(test)]
pub(crate) mod fixtures;

pub use native_price::{StablePairTier, StableQuote};
pub use whitelist::Whitelist;

/// Price resolution over a snapshot of persisted entities.
///
/// Holds only borrowed dependencies, so results depend solely on the current
/// store contents and repeated calls are idempotent.
pub struct PriceResolver<'a, S, F> {
    store: &'a S,
    factory: &'a F,
    settings: &'a PricingSettings,
}

impl<'a, S: EntityStore, F> PriceResolver<'a, S, F> {
    pub fn new(store: &'a S, factory: &'a F, settings: &'a PricingSettings) -> Self {
        Self {
            store,
            factory,
            settings,
        }
    }

    /// Check if a token is an anchor (wrapped native or whitelisted stablecoin).
    fn is_whitelisted(&self, token: &Token) -> bool {
        self.settings.whitelist.contains(&token.id)
    }

    /// Cached native USD price from the bundle; zero until the bundle exists.
    fn bundle_native_price(&self) -> BigDecimal {
        match self.store.load_bundle() {
            Some(bundle) => bundle.native_price,
            None => {
                warn!("Bundle {} not found, valuing native asset at zero", BUNDLE_ID);
                BigDecimal::zero()
            },
        }
    }

    /// USD price of one unit of `token`.
    fn usd_price(token: &Token, native_price: &BigDecimal) -> BigDecimal {
        &token.derived_native * native_price
    }
}
