pub mod abis;
pub mod config;
pub mod constants;
pub mod db;
pub mod factory;
pub mod pricing;
pub mod utils;
pub mod worker;

pub use crate::config::{PricingSettings, Settings};
pub use db::{EntitySnapshot, EntityStore, MemoryStore};
pub use factory::{OnchainPairFactory, PairFactory, StorePairFactory};
pub use pricing::PriceResolver;
pub use worker::{apply_syncs, reprice_store, RepriceSummary};
