use std::{
    fs::File,
    io::{self, BufWriter, Write},
    str::FromStr,
};

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use kswap_pricing::{
    apply_syncs, reprice_store, EntitySnapshot, OnchainPairFactory, Settings, StorePairFactory,
};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new()
        .context("Failed to load config. Please ensure config.toml is valid")?;

    let level = LevelFilter::from_str(&settings.log_level)
        .with_context(|| format!("Invalid log_level '{}'", settings.log_level))?;
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("Failed to initialize logger")?;

    let snapshot = EntitySnapshot::from_json_file(&settings.snapshot.input)?;
    info!(
        "Loaded {} tokens and {} pairs from {}",
        snapshot.tokens.len(),
        snapshot.pairs.len(),
        settings.snapshot.input
    );

    let (mut store, syncs) = snapshot.into_parts();
    if !syncs.is_empty() {
        let applied = apply_syncs(&mut store, &syncs).context("Failed to apply Sync events")?;
        info!("Applied {} pending Sync events", applied);
    }

    // Factory lookups go on-chain when an RPC endpoint is configured,
    // otherwise they are answered from the snapshot's own pairs
    let summary = match &settings.rpc {
        Some(rpc) => {
            let factory = OnchainPairFactory::prefetch(rpc, &settings.pricing, &store.token_ids())
                .await
                .context("Failed to prefetch factory pairs")?;
            info!("Prefetched {} factory lookups", factory.len());
            reprice_store(&mut store, &factory, &settings.pricing)?
        },
        None => {
            let factory = StorePairFactory::from_pairs(store.pairs())
                .context("Snapshot contains an invalid pair address")?;
            info!("Using {} snapshot pairs as factory", factory.len());
            reprice_store(&mut store, &factory, &settings.pricing)?
        },
    };

    let repriced = EntitySnapshot::from_store(&store);
    match &settings.snapshot.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output snapshot {}", path))?;
            let mut writer = BufWriter::new(file);
            repriced.write_json(&mut writer)?;
            writer.flush().context("Failed to flush output snapshot")?;
            info!("Wrote repriced snapshot to {}", path);
        },
        None => {
            let mut stdout = io::stdout().lock();
            repriced.write_json(&mut stdout)?;
            writeln!(stdout).context("Failed to write to stdout")?;
        },
    }

    info!(
        "Native price ${}, {} tokens priced, {} untracked, {} pairs updated",
        summary.native_price_usd,
        summary.tokens_priced,
        summary.tokens_untracked,
        summary.pairs_updated
    );

    Ok(())
}
