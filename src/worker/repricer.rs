use anyhow::{anyhow, Context, Result};
use bigdecimal::BigDecimal;
use log::{debug, info};
use num_traits::Zero;

use crate::{
    config::PricingSettings,
    db::{
        models::{Bundle, Pair, SyncEvent},
        EntityStore, MemoryStore,
    },
    factory::PairFactory,
    pricing::PriceResolver,
};

/// Outcome of a full repricing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RepriceSummary {
    pub native_price_usd: BigDecimal,
    pub tokens_priced: usize,
    pub tokens_untracked: usize,
    pub pairs_updated: usize,
}

/// Reprice every entity in `store`, in the order the ingestion layer does
/// after a Sync event:
///
/// 1. native USD price → bundle (created if absent)
/// 2. derived native price of every token, whitelist anchors first
/// 3. native, USD and tracked reserve value of every pair
///
/// Each token is saved before the next one is resolved, so later tokens see
/// freshly priced anchors.
pub fn reprice_store<F: PairFactory>(
    store: &mut MemoryStore,
    factory: &F,
    settings: &PricingSettings,
) -> Result<RepriceSummary> {
    let native_price_usd = PriceResolver::new(&*store, factory, settings).native_price_usd();

    let mut bundle = store
        .load_bundle()
        .unwrap_or_else(|| Bundle::new(BigDecimal::zero()));
    bundle.native_price = native_price_usd.clone();
    store.save_bundle(bundle);
    info!("Native price: ${}", native_price_usd);

    let mut tokens_priced = 0;
    let mut tokens_untracked = 0;

    for id in pricing_order(store, settings) {
        let Some(token) = store.load_token(&id) else {
            continue;
        };

        let derived_native = PriceResolver::new(&*store, factory, settings)
            .derived_native(&token)
            .with_context(|| format!("Failed to derive native price for token {}", id))?;

        if derived_native.is_zero() {
            debug!("Token {} ({}) is untracked", token.symbol, id);
            tokens_untracked += 1;
        } else {
            tokens_priced += 1;
        }

        store.save_token(token.with_derived_native(derived_native));
    }

    let mut pairs_updated = 0;

    for id in store.pair_ids() {
        let Some(pair) = store.load_pair(&id) else {
            continue;
        };

        let pair = revalue_pair(store, factory, settings, pair, &native_price_usd);
        store.save_pair(pair);
        pairs_updated += 1;
    }

    let summary = RepriceSummary {
        native_price_usd,
        tokens_priced,
        tokens_untracked,
        pairs_updated,
    };

    info!(
        "Repriced {} tokens ({} untracked) and {} pairs",
        summary.tokens_priced + summary.tokens_untracked,
        summary.tokens_untracked,
        summary.pairs_updated
    );

    Ok(summary)
}

/// Apply raw Sync events to their pairs, in order.
///
/// Unknown pairs or tokens are errors: a Sync can only come from a pair the
/// host has already created.
pub fn apply_syncs(store: &mut MemoryStore, events: &[SyncEvent]) -> Result<usize> {
    for event in events {
        let mut pair = store
            .load_pair(&event.pair)
            .ok_or_else(|| anyhow!("Sync for unknown pair {}", event.pair))?;

        let decimals = |id: &str| {
            store
                .load_token(id)
                .map(|token| token.decimals)
                .ok_or_else(|| anyhow!("Token {} of pair {} is not stored", id, pair.id))
        };
        let decimals0 = decimals(&pair.token0)?;
        let decimals1 = decimals(&pair.token1)?;

        pair.apply_sync(event, decimals0, decimals1)?;
        debug!(
            "Synced pair {}: reserve0={} reserve1={}",
            pair.id, pair.reserve0, pair.reserve1
        );
        store.save_pair(pair);
    }

    Ok(events.len())
}

/// Stored whitelist anchors in whitelist order, then every other token by id.
fn pricing_order(store: &MemoryStore, settings: &PricingSettings) -> Vec<String> {
    let mut order: Vec<String> = settings
        .whitelist
        .iter()
        .filter(|anchor| store.load_token(anchor).is_some())
        .map(str::to_string)
        .collect();

    order.extend(
        store
            .token_ids()
            .into_iter()
            .filter(|id| !settings.whitelist.contains(id)),
    );

    order
}

fn revalue_pair<F: PairFactory>(
    store: &MemoryStore,
    factory: &F,
    settings: &PricingSettings,
    mut pair: Pair,
    native_price_usd: &BigDecimal,
) -> Pair {
    let derived = |id: &str| {
        store
            .load_token(id)
            .map(|token| token.derived_native)
            .unwrap_or_default()
    };

    pair.reserve_native =
        &pair.reserve0 * derived(&pair.token0) + &pair.reserve1 * derived(&pair.token1);
    pair.reserve_usd = &pair.reserve_native * native_price_usd;
    pair.tracked_reserve_native =
        PriceResolver::new(store, factory, settings).tracked_reserve_native(&pair);

    pair
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::USDC_NATIVE_PAIR,
        db::EntitySnapshot,
        factory::StorePairFactory,
        pricing::fixtures::{
            dec, pair, store_with, token, usdc_pair, NATIVE, PAIR_X_NATIVE, TOKEN_X, TOKEN_Y,
            USDC,
        },
    };

    /// Native/USDC 30/60 and X/native 100/50, with stale token prices.
    fn stale_store() -> MemoryStore {
        let mut usdc = usdc_pair();
        usdc.reserve_native = dec("60");
        usdc.liquidity_provider_count = 10;

        let mut x_native = pair(PAIR_X_NATIVE, TOKEN_X, NATIVE, "100", "50");
        x_native.reserve_native = dec("100");
        x_native.liquidity_provider_count = 10;

        store_with(
            vec![
                token(NATIVE, "0"),
                token(USDC, "0"),
                token(TOKEN_X, "0"),
                token(TOKEN_Y, "7"),
            ],
            vec![usdc, x_native],
            None,
        )
    }

    fn reprice(store: &mut MemoryStore) -> RepriceSummary {
        let factory = StorePairFactory::from_pairs(store.pairs()).unwrap();
        reprice_store(store, &factory, &PricingSettings::default()).unwrap()
    }

    #[test]
    fn test_reprice_summary() {
        let mut store = stale_store();
        let summary = reprice(&mut store);

        assert_eq!(summary.native_price_usd, dec("2"));
        assert_eq!(summary.tokens_priced, 3);
        assert_eq!(summary.tokens_untracked, 1);
        assert_eq!(summary.pairs_updated, 2);
    }

    #[test]
    fn test_bundle_created_at_genesis() {
        let mut store = stale_store();
        assert!(store.load_bundle().is_none());

        reprice(&mut store);
        assert_eq!(store.load_bundle().unwrap().native_price, dec("2"));
    }

    #[test]
    fn test_anchors_priced_before_dependents() {
        let mut store = stale_store();
        reprice(&mut store);

        assert_eq!(store.load_token(NATIVE).unwrap().derived_native, dec("1"));
        // 0.5 native per USDC, resolved against the freshly saved native price
        assert_eq!(store.load_token(USDC).unwrap().derived_native, dec("0.5"));
        assert_eq!(store.load_token(TOKEN_X).unwrap().derived_native, dec("0.5"));
        // no pair at all, stale value is cleared
        assert!(store.load_token(TOKEN_Y).unwrap().derived_native.is_zero());
    }

    #[test]
    fn test_pair_values_recomputed() {
        let mut store = stale_store();
        reprice(&mut store);

        let usdc = store.load_pair(USDC_NATIVE_PAIR).unwrap();
        // 30 * 1 + 60 * 0.5
        assert_eq!(usdc.reserve_native, dec("60"));
        assert_eq!(usdc.reserve_usd, dec("120"));
        assert_eq!(usdc.tracked_reserve_native, dec("60"));

        let x_native = store.load_pair(PAIR_X_NATIVE).unwrap();
        // 100 * 0.5 + 50 * 1
        assert_eq!(x_native.reserve_native, dec("100"));
        assert_eq!(x_native.reserve_usd, dec("200"));
        // only the native side is trusted: 2 * 50 native
        assert_eq!(x_native.tracked_reserve_native, dec("100"));
    }

    #[test]
    fn test_second_pass_is_stable() {
        let mut store = stale_store();
        let first = reprice(&mut store);
        let after_first = EntitySnapshot::from_store(&store);

        let second = reprice(&mut store);
        let after_second = EntitySnapshot::from_store(&store);

        assert_eq!(first, second);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_existing_bundle_is_overwritten() {
        let mut store = stale_store();
        store.save_bundle(Bundle::new(dec("999")));

        let summary = reprice(&mut store);
        assert_eq!(summary.native_price_usd, dec("2"));
        assert_eq!(store.load_bundle().unwrap().native_price, dec("2"));
    }

    #[test]
    fn test_sync_then_reprice() {
        let mut store = stale_store();
        // USDC/native moves to 30 native vs 120 USDC (both 18 decimals)
        let events = [SyncEvent::new(
            USDC_NATIVE_PAIR,
            "30000000000000000000",
            "120000000000000000000",
        )];

        assert_eq!(apply_syncs(&mut store, &events).unwrap(), 1);
        let summary = reprice(&mut store);

        assert_eq!(summary.native_price_usd, dec("4"));
        let usdc = store.load_token(USDC).unwrap();
        assert_eq!(usdc.derived_native, dec("0.25"));
        assert_eq!(usdc.derived_native * &summary.native_price_usd, dec("1"));
    }

    #[test]
    fn test_sync_for_unknown_pair_fails() {
        let mut store = stale_store();
        let events = [SyncEvent::new(TOKEN_Y, "1", "1")];

        assert!(apply_syncs(&mut store, &events).is_err());
    }

    #[test]
    fn test_invalid_token_id_fails_pass() {
        let mut store = stale_store();
        store.save_token(token("0xnot-an-address", "0"));

        let factory = StorePairFactory::from_pairs(store.pairs()).unwrap();
        let result = reprice_store(&mut store, &factory, &PricingSettings::default());
        assert!(result.is_err());
    }
}
