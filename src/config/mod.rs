#[allow(clippy::module_inception)]
mod config;

pub use self::config::{
    PricingSettings, RpcSettings, Settings, SnapshotSettings, StablePair, StablePairs,
};
