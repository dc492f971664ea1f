use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::market_data::adapters::{get_json, require_price, trim_base};
use crate::market_data::error::ProviderError;
use crate::market_data::provider::MarketDataProvider;
use crate::market_data::types::{ProviderKind, ProviderQuote};

#[derive(Debug, Deserialize)]
struct TokenMetaResponse {
    #[serde(default)]
    success: bool,
    data: Option<TokenMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenMeta {
    price_usdt: Option<Decimal>,
    supply: Option<Decimal>,
    holder: Option<u64>,
}

/// Solscan token metadata. The only source that reports a holder count.
pub struct SolscanAdapter {
    client: Client,
    base_url: String,
}

impl SolscanAdapter {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl MarketDataProvider for SolscanAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Solscan
    }

    async fn fetch_quote(&self, asset_id: &str) -> Result<ProviderQuote, ProviderError> {
        let request = self
            .client
            .get(format!("{}/token/meta", self.base_url))
            .query(&[("token", asset_id)]);
        let resp: TokenMetaResponse = get_json(self.kind(), request).await?;

        if !resp.success {
            return Err(ProviderError::payload("success flag not set"));
        }
        let meta = resp
            .data
            .ok_or_else(|| ProviderError::payload("missing data"))?;
        let price = require_price(meta.price_usdt, "priceUsdt")?;
        let market_cap = meta.supply.and_then(|supply| price.checked_mul(supply));

        Ok(ProviderQuote::new(price)
            .with_market_cap(market_cap)
            .with_holders(meta.holder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverCfg;
    use crate::market_data::resolver::MarketDataResolver;
    use crate::state::snapshot::SnapshotSource;
    use serde_json::json;
    use std::sync::Arc;
    use std::str::FromStr;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/token/meta"))
            .and(query_param("token", "X1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn derives_cap_from_reported_supply() {
        let server = serve(json!({
            "success": true,
            "data": { "priceUsdt": 0.0000008, "supply": "10000000000", "holder": 2612 }
        }))
        .await;

        let adapter = SolscanAdapter::new(Client::new(), &server.uri());
        let quote = adapter.fetch_quote("X1").await.unwrap();
        assert_eq!(quote.price, Decimal::from_str("0.0000008").unwrap());
        assert_eq!(quote.market_cap, Some(Decimal::from(8_000)));
        assert_eq!(quote.holders, Some(2612));
    }

    #[tokio::test]
    async fn missing_supply_leaves_cap_for_resolver() {
        let server = serve(json!({ "success": true, "data": { "priceUsdt": "0.0000008" } })).await;

        let adapter = SolscanAdapter::new(Client::new(), &server.uri());
        let quote = adapter.fetch_quote("X1").await.unwrap();
        assert_eq!(quote.market_cap, None);
        assert_eq!(quote.holders, None);
    }

    #[tokio::test]
    async fn zero_holder_count_is_left_for_placeholder() {
        let server = serve(json!({
            "success": true,
            "data": { "priceUsdt": 0.0000008, "holder": 0 }
        }))
        .await;

        let adapter = SolscanAdapter::new(Client::new(), &server.uri());
        let quote = adapter.fetch_quote("X1").await.unwrap();
        assert_eq!(quote.holders, None);

        let resolver = MarketDataResolver::new(vec![Arc::new(adapter) as Arc<dyn MarketDataProvider>], ResolverCfg::default());
        let snap = resolver.resolve("X1").await;
        assert_eq!(snap.holder_count, 2485);
        assert_eq!(snap.source, SnapshotSource::Provider(ProviderKind::Solscan));
    }

    #[tokio::test]
    async fn unsuccessful_response_misses() {
        let server = serve(json!({ "success": false, "data": { "priceUsdt": 0.0000008 } })).await;
        let adapter = SolscanAdapter::new(Client::new(), &server.uri());
        assert!(matches!(adapter.fetch_quote("X1").await, Err(ProviderError::Payload(_))));

        let server = serve(json!({ "data": { "priceUsdt": 0.0000008 } })).await;
        let adapter = SolscanAdapter::new(Client::new(), &server.uri());
        assert!(matches!(adapter.fetch_quote("X1").await, Err(ProviderError::Payload(_))));
    }

    #[tokio::test]
    async fn missing_price_misses() {
        let server = serve(json!({ "success": true, "data": { "holder": 10 } })).await;
        let adapter = SolscanAdapter::new(Client::new(), &server.uri());
        assert!(matches!(adapter.fetch_quote("X1").await, Err(ProviderError::Payload(_))));
    }
}
