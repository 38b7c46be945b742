//! Shared entity fixtures for pricing tests.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::{
    constants::{
        BUSD_NATIVE_PAIR, USDC_ADDRESS, USDC_NATIVE_PAIR, USDT_ADDRESS, USDT_NATIVE_PAIR,
        WRAPPED_NATIVE_ADDRESS,
    },
    db::{
        models::{Bundle, Pair, Token},
        MemoryStore,
    },
};

pub const NATIVE: &str = WRAPPED_NATIVE_ADDRESS;
pub const USDC: &str = USDC_ADDRESS;
pub const USDT: &str = USDT_ADDRESS;
/// Not whitelisted; only appears in the first designated stablecoin pair.
pub const BUSD: &str = "0xe3f5a90f9cb311505cd691a46596599aa1a0ad7d";
/// Non-whitelisted tokens.
pub const TOKEN_X: &str = "0x2ca48b4eea5a731c2b54e7c3944dbdb87c0cfb6f";
pub const TOKEN_Y: &str = "0x652d253b7ca91810a4a05acfc39729387c5090c0";

pub const PAIR_X_NATIVE: &str = "0x1d1b1c0a1d2c1a3b4c5d6e7f8091a2b3c4d5e6f7";
pub const PAIR_X_USDC: &str = "0x8e1f2a3b4c5d6e7f8091a2b3c4d5e6f708192a3b";

pub fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

pub fn token(id: &str, derived_native: &str) -> Token {
    Token::new(id, "TKN", "Token", 18).with_derived_native(dec(derived_native))
}

/// Pair with spot prices synced from its reserves.
pub fn pair(id: &str, token0: &str, token1: &str, reserve0: &str, reserve1: &str) -> Pair {
    let pair = Pair::new(id, token0, token1).with_reserves(dec(reserve0), dec(reserve1));
    assert_eq!(
        &pair.token0_price * &pair.reserve1,
        pair.reserve0,
        "fixture violates token0_price * reserve1 == reserve0"
    );
    pair
}

/// BUSD/native pair: native is token0 (10), implied price 1.
pub fn busd_pair() -> Pair {
    pair(BUSD_NATIVE_PAIR, NATIVE, BUSD, "10", "10")
}

/// USDC/native pair: native is token0 (30), implied price 2.
pub fn usdc_pair() -> Pair {
    pair(USDC_NATIVE_PAIR, NATIVE, USDC, "30", "60")
}

/// USDT/native pair: USDT is token0, native is token1 (60), implied price 4.
pub fn usdt_pair() -> Pair {
    pair(USDT_NATIVE_PAIR, USDT, NATIVE, "240", "60")
}

pub fn store_with(tokens: Vec<Token>, pairs: Vec<Pair>, native_price: Option<&str>) -> MemoryStore {
    let mut store = MemoryStore::new();
    for token in tokens {
        store.save_token(token);
    }
    for pair in pairs {
        store.save_pair(pair);
    }
    if let Some(price) = native_price {
        store.save_bundle(Bundle::new(dec(price)));
    }
    store
}
