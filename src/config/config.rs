use std::str::FromStr;

use bigdecimal::BigDecimal;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{
    constants,
    db::models::TokenSide,
    pricing::Whitelist,
};

/// One of the designated native/stablecoin pairs used to price the native asset.
///
/// The stablecoin side is fixed per pair address, never inferred.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StablePair {
    pub address: String,
    pub stable_side: TokenSide,
}

impl StablePair {
    pub fn new(address: &str, stable_side: TokenSide) -> Self {
        Self {
            address: address.to_lowercase(),
            stable_side,
        }
    }

    /// Side holding the native asset.
    pub fn native_side(&self) -> TokenSide {
        self.stable_side.opposite()
    }
}

/// The three designated stablecoin pairs, in precedence order.
///
/// - first + second + third → weighted average of all three
/// - first + second → weighted average of those two
/// - second → its price alone
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StablePairs {
    pub first: StablePair,
    pub second: StablePair,
    pub third: StablePair,
}

fn default_stable_pairs() -> StablePairs {
    StablePairs {
        first: StablePair::new(constants::BUSD_NATIVE_PAIR, TokenSide::Token1),
        second: StablePair::new(constants::USDC_NATIVE_PAIR, TokenSide::Token1),
        third: StablePair::new(constants::USDT_NATIVE_PAIR, TokenSide::Token0),
    }
}

/// Pricing policy: anchors, stablecoin pairs and anti-manipulation thresholds.
///
/// Every field defaults to the deployment constants, so an empty `[pricing]`
/// section reproduces the deployed pricing values exactly.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PricingSettings {
    #[serde(default = "default_native_token")]
    pub native_token: String,
    #[serde(default = "default_whitelist")]
    pub whitelist: Whitelist,
    #[serde(default = "default_stable_pairs")]
    pub stable_pairs: StablePairs,
    #[serde(default = "default_minimum_usd_threshold_new_pairs")]
    pub minimum_usd_threshold_new_pairs: BigDecimal,
    #[serde(default = "default_minimum_liquidity_threshold_native")]
    pub minimum_liquidity_threshold_native: BigDecimal,
    #[serde(default = "default_lp_maturity_cutoff")]
    pub lp_maturity_cutoff: u64,
}

fn default_native_token() -> String {
    constants::WRAPPED_NATIVE_ADDRESS.to_string()
}

fn default_whitelist() -> Whitelist {
    Whitelist::new(constants::WHITELIST)
}

fn default_minimum_usd_threshold_new_pairs() -> BigDecimal {
    decimal_constant(constants::MINIMUM_USD_THRESHOLD_NEW_PAIRS)
}

fn default_minimum_liquidity_threshold_native() -> BigDecimal {
    decimal_constant(constants::MINIMUM_LIQUIDITY_THRESHOLD_NATIVE)
}

fn default_lp_maturity_cutoff() -> u64 {
    constants::LP_MATURITY_CUTOFF
}

// Constants are plain integers, parsing cannot fail
fn decimal_constant(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap_or_default()
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            native_token: default_native_token(),
            whitelist: default_whitelist(),
            stable_pairs: default_stable_pairs(),
            minimum_usd_threshold_new_pairs: default_minimum_usd_threshold_new_pairs(),
            minimum_liquidity_threshold_native: default_minimum_liquidity_threshold_native(),
            lp_maturity_cutoff: default_lp_maturity_cutoff(),
        }
    }
}

impl PricingSettings {
    pub fn is_native(&self, token: &str) -> bool {
        self.native_token.eq_ignore_ascii_case(token)
    }
}

/// Entity snapshot input/output locations.
#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotSettings {
    #[serde(default = "default_snapshot_input")]
    pub input: String,
    /// Output path; the repriced snapshot goes to stdout when unset
    #[serde(default)]
    pub output: Option<String>,
}

fn default_snapshot_input() -> String {
    "snapshot.json".to_string()
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            input: default_snapshot_input(),
            output: None,
        }
    }
}

/// JSON-RPC access to the pair factory contract.
///
/// When present, `getPair` lookups are answered by the on-chain factory
/// instead of the pairs already in the snapshot.
#[derive(Debug, Deserialize, Clone)]
pub struct RpcSettings {
    pub url: String,
    pub factory_address: String,
    #[serde(default = "default_rpc_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_rpc_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_rpc_concurrency() -> usize {
    8
}

fn default_rpc_timeout_secs() -> u64 {
    30
}

/// Root application configuration.
///
/// Loaded from `config.{yaml,toml,json}` at startup, with `KSWAP__`-prefixed
/// environment variables taking precedence (e.g. `KSWAP__SNAPSHOT__INPUT`).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub snapshot: SnapshotSettings,
    #[serde(default)]
    pub rpc: Option<RpcSettings>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("KSWAP").separator("__"))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}
