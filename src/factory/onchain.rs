use std::time::Duration;

use alloy::{
    primitives::Address,
    providers::{DynProvider, ProviderBuilder},
};
use anyhow::{anyhow, bail, Context, Result};
use futures::{stream, StreamExt, TryStreamExt};
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};
use url::Url;

use super::{pair_key, PairFactory};
use crate::{
    abis::factory::IUniswapV2Factory::{self, IUniswapV2FactoryInstance},
    config::{PricingSettings, RpcSettings},
    utils::parse_address,
};

/// Maximum retries per getPair call
const MAX_RETRIES: u32 = 3;

/// Delay between retries (exponential backoff base)
const RETRY_DELAY_MS: u64 = 100;

/// Pair factory backed by the on-chain factory contract.
///
/// The pricing core is synchronous, so every (token, anchor) lookup it can
/// make is resolved up front over JSON-RPC and served from memory afterwards.
/// Asking for a combination that was not prefetched is an error.
#[derive(Debug, Clone, Default)]
pub struct OnchainPairFactory {
    pairs: FxHashMap<(Address, Address), Address>,
}

impl OnchainPairFactory {
    /// Resolve `getPair(token, anchor)` for every token against every whitelist anchor.
    pub async fn prefetch(
        rpc: &RpcSettings,
        pricing: &PricingSettings,
        tokens: &[String],
    ) -> Result<Self> {
        let url = Url::parse(&rpc.url).context("Invalid RPC URL")?;
        let provider = DynProvider::new(ProviderBuilder::new().connect_http(url));
        let factory_address =
            parse_address(&rpc.factory_address).context("Invalid factory address")?;

        let client = FactoryClient {
            contract: IUniswapV2Factory::new(factory_address, provider),
            timeout: Duration::from_secs(rpc.timeout_secs),
        };

        let lookups = plan_lookups(pricing, tokens)?;
        info!(
            "Prefetching {} getPair lookups from factory {}",
            lookups.len(),
            rpc.factory_address
        );

        let client = &client;
        let resolved: Vec<((Address, Address), Address)> = stream::iter(lookups)
            .map(move |(token_a, token_b)| async move {
                let pair = client.get_pair_with_retry(token_a, token_b).await?;
                Ok::<_, anyhow::Error>(((token_a, token_b), pair))
            })
            .buffer_unordered(rpc.concurrency.max(1))
            .try_collect()
            .await?;

        Ok(Self::from_resolved(resolved))
    }

    /// Build from already-resolved lookups.
    pub fn from_resolved(
        resolved: impl IntoIterator<Item = ((Address, Address), Address)>,
    ) -> Self {
        let pairs = resolved
            .into_iter()
            .map(|((token_a, token_b), pair)| (pair_key(token_a, token_b), pair))
            .collect();
        Self { pairs }
    }

    /// Number of lookups held, including ones that resolved to no pair.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl PairFactory for OnchainPairFactory {
    fn get_pair(&self, token_a: Address, token_b: Address) -> Result<Address> {
        if token_a == token_b {
            return Ok(Address::ZERO);
        }
        match self.pairs.get(&pair_key(token_a, token_b)) {
            Some(pair) => Ok(*pair),
            None => bail!("getPair({token_a}, {token_b}) was not prefetched"),
        }
    }
}

/// Every distinct (token, anchor) combination the resolver may query.
///
/// The wrapped native token never searches the whitelist, so it is skipped.
fn plan_lookups(pricing: &PricingSettings, tokens: &[String]) -> Result<Vec<(Address, Address)>> {
    let anchors = pricing
        .whitelist
        .iter()
        .map(parse_address)
        .collect::<Result<Vec<_>>>()?;

    let mut seen = FxHashSet::default();
    let mut lookups = Vec::new();

    for token in tokens {
        if pricing.is_native(token) {
            continue;
        }
        let token = parse_address(token)?;
        for anchor in &anchors {
            if token == *anchor {
                continue;
            }
            let key = pair_key(token, *anchor);
            if seen.insert(key) {
                lookups.push(key);
            }
        }
    }

    Ok(lookups)
}

struct FactoryClient {
    contract: IUniswapV2FactoryInstance<DynProvider>,
    timeout: Duration,
}

impl FactoryClient {
    async fn get_pair_with_retry(&self, token_a: Address, token_b: Address) -> Result<Address> {
        let mut last_error = anyhow!("no attempts made");

        for attempt in 0..MAX_RETRIES {
            match tokio::time::timeout(self.timeout, self.contract.getPair(token_a, token_b).call())
                .await
            {
                Ok(Ok(pair)) => return Ok(pair),
                Ok(Err(e)) => last_error = anyhow::Error::from(e),
                Err(_) => last_error = anyhow!("getPair timed out after {:?}", self.timeout),
            }

            if attempt < MAX_RETRIES - 1 {
                debug!("getPair({token_a}, {token_b}) attempt {} failed, retrying", attempt + 1);
                let delay = Duration::from_millis(RETRY_DELAY_MS * 2_u64.pow(attempt));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.context(format!("getPair({token_a}, {token_b}) failed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{USDC_ADDRESS, USDT_ADDRESS, WRAPPED_NATIVE_ADDRESS};

    const OTHER_TOKEN: &str = "0x2ca48b4eea5a731c2b54e7c3944dbdb87c0cfb6f";

    #[test]
    fn test_plan_skips_native_and_self_pairs() {
        let pricing = PricingSettings::default();
        let tokens = vec![
            WRAPPED_NATIVE_ADDRESS.to_string(),
            USDC_ADDRESS.to_string(),
            OTHER_TOKEN.to_string(),
        ];

        let lookups = plan_lookups(&pricing, &tokens).unwrap();

        // USDC: native + USDT (self skipped); other token: all three anchors
        assert_eq!(lookups.len(), 5);
        let usdc = parse_address(USDC_ADDRESS).unwrap();
        assert!(!lookups.contains(&(usdc, usdc)));
    }

    #[test]
    fn test_plan_dedupes_reverse_lookups() {
        let pricing = PricingSettings::default();
        let tokens = vec![USDC_ADDRESS.to_string(), USDT_ADDRESS.to_string()];

        // USDC→{native, USDT}, USDT→{native, USDC(dup)}
        let lookups = plan_lookups(&pricing, &tokens).unwrap();
        assert_eq!(lookups.len(), 3);
    }

    #[test]
    fn test_unprefetched_lookup_is_error() {
        let native = parse_address(WRAPPED_NATIVE_ADDRESS).unwrap();
        let usdc = parse_address(USDC_ADDRESS).unwrap();
        let usdt = parse_address(USDT_ADDRESS).unwrap();

        let factory = OnchainPairFactory::from_resolved(vec![((usdc, native), Address::ZERO)]);

        assert_eq!(factory.get_pair(native, usdc).unwrap(), Address::ZERO);
        assert_eq!(factory.get_pair(usdt, usdt).unwrap(), Address::ZERO);
        assert!(factory.get_pair(native, usdt).is_err());
    }
}
