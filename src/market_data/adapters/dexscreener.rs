use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::market_data::adapters::{get_json, require_price, trim_base};
use crate::market_data::error::ProviderError;
use crate::market_data::provider::MarketDataProvider;
use crate::market_data::types::{ProviderKind, ProviderQuote};

#[derive(Debug, Deserialize)]
struct TokenPairsResponse {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pair {
    price_usd: Option<Decimal>,
    market_cap: Option<Decimal>,
    /// Fully diluted valuation.
    fdv: Option<Decimal>,
}

/// DexScreener lists every pool trading the token; new tokens show up here
/// long before aggregators pick them up.
pub struct DexScreenerAdapter {
    client: Client,
    base_url: String,
}

impl DexScreenerAdapter {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }

    fn tokens_url(&self, asset_id: &str) -> String {
        format!("{}/latest/dex/tokens/{}", self.base_url, asset_id)
    }
}

#[async_trait]
impl MarketDataProvider for DexScreenerAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DexScreener
    }

    async fn fetch_quote(&self, asset_id: &str) -> Result<ProviderQuote, ProviderError> {
        let request = self.client.get(self.tokens_url(asset_id));
        let resp: TokenPairsResponse = get_json(self.kind(), request).await?;

        // First pair is the most liquid one
        let pair = resp
            .pairs
            .and_then(|pairs| pairs.into_iter().next())
            .ok_or_else(|| ProviderError::payload("no trading pairs"))?;

        let price = require_price(pair.price_usd, "priceUsd")?;

        Ok(ProviderQuote::new(price).with_market_cap(pair.market_cap.or(pair.fdv)))
    }
}
