pub mod repricer;

pub use repricer::{apply_syncs, reprice_store, RepriceSummary};
