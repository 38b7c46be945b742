//! Entity models and the storage seam the pricing core reads through.
//!
//! The host owns persistence; this crate only needs lookups by identity
//! ([`EntityStore`]) plus an in-memory implementation and a JSON snapshot
//! format for running the repricing pass outside the indexer.

pub mod models;
pub mod snapshot;
pub mod store;

pub use snapshot::EntitySnapshot;
pub use store::{EntityStore, MemoryStore};
