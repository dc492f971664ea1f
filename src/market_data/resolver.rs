use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ResolverCfg;
use crate::market_data::provider::MarketDataProvider;
use crate::market_data::synthetic::SyntheticSource;
use crate::market_data::types::{ProviderKind, ProviderQuote};
use crate::metrics::prometheus::{
    record_provider_attempt, record_provider_latency, record_synthetic_fallback,
};
use crate::state::snapshot::{MarketSnapshot, SnapshotSource};

/// Produces one [`MarketSnapshot`] per call, preferring live data.
///
/// Providers are tried strictly in order, one attempt each. The first valid
/// quote wins and the rest are never called. If every provider misses, the
/// snapshot is synthesized, so `resolve` has no failure path.
pub struct MarketDataResolver {
    providers: Vec<Arc<dyn MarketDataProvider>>,
    cfg: ResolverCfg,
    synthetic: SyntheticSource,
}

impl MarketDataResolver {
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>, cfg: ResolverCfg) -> Self {
        let synthetic = match cfg.synthetic_seed {
            Some(seed) => SyntheticSource::with_seed(cfg.clone(), seed),
            None => SyntheticSource::new(cfg.clone()),
        };
        Self::with_synthetic(providers, cfg, synthetic)
    }

    pub fn with_synthetic(
        providers: Vec<Arc<dyn MarketDataProvider>>,
        cfg: ResolverCfg,
        synthetic: SyntheticSource,
    ) -> Self {
        Self {
            providers,
            cfg,
            synthetic,
        }
    }

    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    pub async fn resolve(&self, asset_id: &str) -> MarketSnapshot {
        if asset_id.trim().is_empty() {
            warn!("empty asset identifier, skipping providers");
            return self.fallback();
        }

        for provider in &self.providers {
            let kind = provider.kind();
            let started = Instant::now();
            let result = provider.fetch_quote(asset_id).await;
            record_provider_latency(kind.as_str(), started.elapsed().as_secs_f64() * 1_000.0);

            match result {
                Ok(quote) => {
                    record_provider_attempt(kind.as_str(), "hit");
                    info!(provider = %kind, asset_id, price = %quote.price, "market data resolved");
                    return self.complete(kind, quote);
                }
                Err(err) => {
                    record_provider_attempt(kind.as_str(), err.kind());
                    warn!(
                        provider = %kind,
                        asset_id,
                        kind = err.kind(),
                        error = %err,
                        "provider miss, trying next"
                    );
                }
            }
        }

        warn!(asset_id, "all providers exhausted, using synthetic market data");
        self.fallback()
    }

    /// Fills in whatever the provider left out.
    fn complete(&self, kind: ProviderKind, quote: ProviderQuote) -> MarketSnapshot {
        let market_cap = match quote.market_cap {
            Some(cap) => cap,
            None => {
                debug!(provider = %kind, "deriving market cap from circulating supply");
                quote.price.saturating_mul(self.cfg.circulating_supply)
            }
        };

        MarketSnapshot {
            price: quote.price,
            market_cap,
            holder_count: quote.holders.unwrap_or(self.cfg.placeholder_holders),
            is_loading: false,
            source: SnapshotSource::Provider(kind),
        }
    }

    fn fallback(&self) -> MarketSnapshot {
        record_synthetic_fallback();
        self.synthetic.snapshot()
    }
}
