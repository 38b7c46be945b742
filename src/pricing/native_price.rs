//! Native asset USD price from the designated stablecoin pairs.
//!
//! Which pairs exist decides the formula, in strict precedence:
//!
//! 1. first, second and third → reserve-weighted average of all three
//! 2. first and second → reserve-weighted average of those two
//! 3. second → its implied price, unweighted
//! 4. anything else → zero
//!
//! Combinations outside this ladder (first + third, third alone, ...) are not
//! merged; they land on whichever lower tier still matches. The ordering
//! reflects the order the pairs came online and is kept as is.

use bigdecimal::BigDecimal;
use log::debug;
use num_traits::Zero;

use super::PriceResolver;
use crate::{
    config::StablePair,
    db::{models::Pair, EntityStore},
};

/// A designated stablecoin pair that exists in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StableQuote<'s> {
    pub config: &'s StablePair,
    pub pair: Pair,
}

impl StableQuote<'_> {
    /// Native-asset reserve of the pair, used as its weight.
    pub fn native_reserve(&self) -> &BigDecimal {
        self.pair.reserve(self.config.native_side())
    }

    /// Stablecoin units per native unit.
    ///
    /// - stable is token1 → token1_price
    /// - stable is token0 → token0_price
    pub fn implied_price(&self) -> &BigDecimal {
        self.pair.spot_rate(self.config.native_side())
    }
}

/// Presence combination of the designated pairs, resolved to a pricing tier.
#[derive(Debug, Clone, PartialEq)]
pub enum StablePairTier<'s> {
    AllThree([StableQuote<'s>; 3]),
    FirstTwo([StableQuote<'s>; 2]),
    SecondOnly(StableQuote<'s>),
    Unpriced,
}

impl<'s> StablePairTier<'s> {
    pub fn classify(
        first: Option<StableQuote<'s>>,
        second: Option<StableQuote<'s>>,
        third: Option<StableQuote<'s>>,
    ) -> Self {
        match (first, second, third) {
            (Some(first), Some(second), Some(third)) => {
                StablePairTier::AllThree([first, second, third])
            },
            (Some(first), Some(second), None) => StablePairTier::FirstTwo([first, second]),
            (_, Some(second), _) => StablePairTier::SecondOnly(second),
            _ => StablePairTier::Unpriced,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StablePairTier::AllThree(_) => "all_three",
            StablePairTier::FirstTwo(_) => "first_two",
            StablePairTier::SecondOnly(_) => "second_only",
            StablePairTier::Unpriced => "unpriced",
        }
    }

    /// Native USD price for this tier.
    pub fn price(&self) -> BigDecimal {
        match self {
            StablePairTier::AllThree(quotes) => weighted_price(quotes),
            StablePairTier::FirstTwo(quotes) => weighted_price(quotes),
            StablePairTier::SecondOnly(quote) => quote.implied_price().clone(),
            StablePairTier::Unpriced => BigDecimal::zero(),
        }
    }
}

/// Σ implied_price_i × (native_reserve_i / Σ native_reserve).
///
/// Zero when the pairs hold no native reserves at all.
fn weighted_price(quotes: &[StableQuote<'_>]) -> BigDecimal {
    let total_native: BigDecimal = quotes.iter().map(|quote| quote.native_reserve()).sum();
    if total_native.is_zero() {
        return BigDecimal::zero();
    }

    quotes
        .iter()
        .map(|quote| {
            let weight = quote.native_reserve() / &total_native;
            quote.implied_price() * weight
        })
        .sum()
}

impl<S: EntityStore, F> PriceResolver<'_, S, F> {
    /// Compute the native asset's USD price from the designated stablecoin pairs.
    pub fn native_price_usd(&self) -> BigDecimal {
        let pairs = &self.settings.stable_pairs;
        let tier = StablePairTier::classify(
            self.stable_quote(&pairs.first),
            self.stable_quote(&pairs.second),
            self.stable_quote(&pairs.third),
        );

        let price = tier.price();
        debug!("Native price from {} stable pairs: {}", tier.name(), price);
        price
    }

    fn stable_quote<'s>(&self, config: &'s StablePair) -> Option<StableQuote<'s>> {
        self.store
            .load_pair(&config.address)
            .map(|pair| StableQuote { config, pair })
    }
}
