//! Deployment constants.
//!
//! Addresses and thresholds of the KCC deployment whose pricing values this
//! crate reproduces. `PricingSettings::default()` is built from these, so
//! changing any of them changes every derived price.

/// Wrapped KCS, the chain's canonical wrapped native asset.
pub const WRAPPED_NATIVE_ADDRESS: &str = "0x4446fc4eb47f2f6586f9faab68b3498f86c07521";

/// USDC on KCC.
pub const USDC_ADDRESS: &str = "0x980a5afef3d17ad98635f6c5aebcbaeded3c3430";

/// USDT on KCC.
pub const USDT_ADDRESS: &str = "0x0039f574ee5cc39bdd162e9a88e3eb1f111baf48";

/// Anchor tokens, in search order.
pub const WHITELIST: [&str; 3] = [WRAPPED_NATIVE_ADDRESS, USDC_ADDRESS, USDT_ADDRESS];

/// BUSD / wrapped-native pair. BUSD is token1.
pub const BUSD_NATIVE_PAIR: &str = "0x26d94a2e3bd703847c3be3c30ead42b926b427c2";

/// USDC / wrapped-native pair. USDC is token1.
pub const USDC_NATIVE_PAIR: &str = "0xc2cacd273630bc1dcb1c7ca398374896fa1d6322";

/// USDT / wrapped-native pair. USDT is token0.
pub const USDT_NATIVE_PAIR: &str = "0x1116b80fd0ff9a980dcfbfa3ed477bfa6bbd6a85";

/// Minimum pool value (USD) before swaps on pools with few LPs count as tracked volume.
pub const MINIMUM_USD_THRESHOLD_NEW_PAIRS: &str = "100";

/// Minimum `reserve_native` a pair needs before it can price a token.
pub const MINIMUM_LIQUIDITY_THRESHOLD_NATIVE: &str = "2";

/// Pools with fewer liquidity providers than this get the new-pair USD floor.
pub const LP_MATURITY_CUTOFF: u64 = 5;

/// Identity of the singleton bundle entity.
pub const BUNDLE_ID: &str = "1";
