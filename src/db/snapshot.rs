use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::db::{
    models::{Bundle, Pair, SyncEvent, Token},
    store::MemoryStore,
};

/// Serialized entity state exchanged with the host.
///
/// Decimal fields are encoded as strings to keep full precision:
///
/// ```json
/// {
///   "bundle": { "native_price": "7.91" },
///   "tokens": [{ "id": "0x...", "symbol": "WKCS", "decimals": 18 }],
///   "pairs": [{ "id": "0x...", "token0": "0x...", "token1": "0x...",
///               "reserve0": "1200.5", "reserve1": "9500.1" }],
///   "syncs": [{ "pair": "0x...", "reserve0": "1200500000000000000000",
///               "reserve1": "9500100000" }]
/// }
/// ```
///
/// `syncs` are raw pending Sync events, applied in order before repricing.
/// Snapshots taken from a store never carry any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    #[serde(default)]
    pub bundle: Option<Bundle>,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub pairs: Vec<Pair>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub syncs: Vec<SyncEvent>,
}

impl EntitySnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse entity snapshot")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid snapshot {}", path.display()))
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("Failed to serialize entity snapshot")
    }

    /// Snapshot of a store, with tokens and pairs sorted by id.
    pub fn from_store(store: &MemoryStore) -> Self {
        let mut tokens: Vec<Token> = store.tokens().cloned().collect();
        tokens.sort_by(|a, b| a.id.cmp(&b.id));

        let mut pairs: Vec<Pair> = store.pairs().cloned().collect();
        pairs.sort_by(|a, b| a.id.cmp(&b.id));

        Self {
            bundle: store.bundle().cloned(),
            tokens,
            pairs,
            syncs: Vec::new(),
        }
    }

    /// Split into a store and the pending Sync events.
    pub fn into_parts(mut self) -> (MemoryStore, Vec<SyncEvent>) {
        let syncs = std::mem::take(&mut self.syncs);
        (self.into_store(), syncs)
    }

    /// Load entities into a store; pending Sync events are dropped.
    ///
    /// Spot prices are rebuilt from each pair's reserves, so snapshots only
    /// need to carry `reserve0` and `reserve1`.
    pub fn into_store(self) -> MemoryStore {
        let mut store = MemoryStore::new();
        for token in self.tokens {
            store.save_token(token);
        }
        for mut pair in self.pairs {
            let reserve0 = std::mem::take(&mut pair.reserve0);
            let reserve1 = std::mem::take(&mut pair.reserve1);
            pair.sync_reserves(reserve0, reserve1);
            store.save_pair(pair);
        }
        if let Some(bundle) = self.bundle {
            store.save_bundle(bundle);
        }
        store
    }
}
