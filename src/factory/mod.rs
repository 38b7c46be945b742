//! Read-only pair factory queries.
//!
//! Mirrors the on-chain `getPair(tokenA, tokenB)` view: lookups are symmetric
//! in their arguments and return [`Address::ZERO`] when no pair exists.

use alloy::primitives::Address;
use anyhow::Result;
use rustc_hash::FxHashMap;

use crate::{db::models::Pair, utils::parse_address};

mod onchain;

pub use onchain::OnchainPairFactory;

pub trait PairFactory {
    /// Pair address for two tokens, or `Address::ZERO` if none exists.
    fn get_pair(&self, token_a: Address, token_b: Address) -> Result<Address>;
}

/// Order-independent key for a token pair.
pub(crate) fn pair_key(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a <= token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// Factory answering lookups from pairs already known to the host.
#[derive(Debug, Clone, Default)]
pub struct StorePairFactory {
    pairs: FxHashMap<(Address, Address), Address>,
}

impl StorePairFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every pair by its two tokens.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a Pair>) -> Result<Self> {
        let mut factory = Self::new();
        for pair in pairs {
            factory.insert(
                parse_address(&pair.token0)?,
                parse_address(&pair.token1)?,
                parse_address(&pair.id)?,
            );
        }
        Ok(factory)
    }

    pub fn insert(&mut self, token_a: Address, token_b: Address, pair: Address) {
        self.pairs.insert(pair_key(token_a, token_b), pair);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl PairFactory for StorePairFactory {
    fn get_pair(&self, token_a: Address, token_b: Address) -> Result<Address> {
        if token_a == token_b {
            return Ok(Address::ZERO);
        }
        Ok(self
            .pairs
            .get(&pair_key(token_a, token_b))
            .copied()
            .unwrap_or(Address::ZERO))
    }
}
