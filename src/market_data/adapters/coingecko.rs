use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::EndpointCfg;
use crate::market_data::adapters::{get_json, require_price, trim_base};
use crate::market_data::error::ProviderError;
use crate::market_data::provider::MarketDataProvider;
use crate::market_data::types::{ProviderKind, ProviderQuote};

#[derive(Debug, Deserialize)]
struct CoinResponse {
    market_data: Option<CoinMarketData>,
}

#[derive(Debug, Deserialize)]
struct CoinMarketData {
    current_price: Option<UsdValue>,
    market_cap: Option<UsdValue>,
}

#[derive(Debug, Deserialize)]
struct UsdValue {
    usd: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct SimpleTokenPrice {
    usd: Option<Decimal>,
    usd_market_cap: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    /// `/coins/{platform}/contract/{address}`: full coin record.
    Contract,
    /// `/simple/token_price/{platform}`: price and cap only.
    SimplePrice,
}

pub struct CoinGeckoAdapter {
    client: Client,
    base_url: String,
    platform: String,
    api_key: Option<String>,
    endpoint: Endpoint,
}

impl CoinGeckoAdapter {
    pub fn contract(client: Client, cfg: &EndpointCfg) -> Self {
        Self::with_endpoint(client, cfg, Endpoint::Contract)
    }

    pub fn simple_price(client: Client, cfg: &EndpointCfg) -> Self {
        Self::with_endpoint(client, cfg, Endpoint::SimplePrice)
    }

    fn with_endpoint(client: Client, cfg: &EndpointCfg, endpoint: Endpoint) -> Self {
        Self {
            client,
            base_url: trim_base(&cfg.coingecko_url),
            platform: cfg.coingecko_platform.clone(),
            api_key: cfg.coingecko_api_key.clone(),
            endpoint,
        }
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("x_cg_demo_api_key", key.as_str())]),
            None => request,
        }
    }

    async fn fetch_contract(&self, asset_id: &str) -> Result<ProviderQuote, ProviderError> {
        let url = format!(
            "{}/api/v3/coins/{}/contract/{}",
            self.base_url, self.platform, asset_id
        );
        let resp: CoinResponse = get_json(self.kind(), self.with_key(self.client.get(url))).await?;

        let data = resp
            .market_data
            .ok_or_else(|| ProviderError::payload("missing market_data"))?;
        let price = require_price(
            data.current_price.and_then(|p| p.usd),
            "market_data.current_price.usd",
        )?;

        Ok(ProviderQuote::new(price).with_market_cap(data.market_cap.and_then(|c| c.usd)))
    }

    async fn fetch_simple(&self, asset_id: &str) -> Result<ProviderQuote, ProviderError> {
        let url = format!(
            "{}/api/v3/simple/token_price/{}",
            self.base_url, self.platform
        );
        let request = self.client.get(url).query(&[
            ("contract_addresses", asset_id),
            ("vs_currencies", "usd"),
            ("include_market_cap", "true"),
        ]);
        let mut resp: HashMap<String, SimpleTokenPrice> =
            get_json(self.kind(), self.with_key(request)).await?;

        // Keys come back lower-cased
        let entry = resp
            .remove(&asset_id.to_lowercase())
            .or_else(|| resp.remove(asset_id))
            .ok_or_else(|| ProviderError::payload(format!("no entry for {asset_id}")))?;
        let price = require_price(entry.usd, "usd")?;

        Ok(ProviderQuote::new(price).with_market_cap(entry.usd_market_cap))
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoAdapter {
    fn kind(&self) -> ProviderKind {
        match self.endpoint {
            Endpoint::Contract => ProviderKind::CoinGecko,
            Endpoint::SimplePrice => ProviderKind::CoinGeckoSimple,
        }
    }

    async fn fetch_quote(&self, asset_id: &str) -> Result<ProviderQuote, ProviderError> {
        match self.endpoint {
            Endpoint::Contract => self.fetch_contract(asset_id).await,
            Endpoint::SimplePrice => self.fetch_simple(asset_id).await,
        }
    }
}
