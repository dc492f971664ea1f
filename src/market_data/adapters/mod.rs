pub mod coingecko;
pub mod dexscreener;
pub mod solscan;

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::EndpointCfg;
use crate::market_data::error::ProviderError;
use crate::market_data::provider::MarketDataProvider;
use crate::market_data::types::ProviderKind;

use coingecko::CoinGeckoAdapter;
use dexscreener::DexScreenerAdapter;
use solscan::SolscanAdapter;

/// Instantiates one adapter per configured provider, preserving order.
pub fn build_providers(
    kinds: &[ProviderKind],
    endpoints: &EndpointCfg,
    client: Client,
) -> Vec<Arc<dyn MarketDataProvider>> {
    kinds
        .iter()
        .map(|kind| -> Arc<dyn MarketDataProvider> {
            match kind {
                ProviderKind::DexScreener => Arc::new(DexScreenerAdapter::new(
                    client.clone(),
                    &endpoints.dexscreener_url,
                )),
                ProviderKind::CoinGecko => Arc::new(CoinGeckoAdapter::contract(
                    client.clone(),
                    endpoints,
                )),
                ProviderKind::CoinGeckoSimple => Arc::new(CoinGeckoAdapter::simple_price(
                    client.clone(),
                    endpoints,
                )),
                ProviderKind::Solscan => {
                    Arc::new(SolscanAdapter::new(client.clone(), &endpoints.solscan_url))
                }
            }
        })
        .collect()
}

/// Sends a JSON GET and classifies every way it can go wrong.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: ProviderKind,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let resp = request.header(ACCEPT, "application/json").send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status));
    }

    let body = resp.bytes().await?;
    debug!(%provider, body = %String::from_utf8_lossy(&body), "provider response");

    serde_json::from_slice(&body)
        .map_err(|e| ProviderError::payload(format!("decoding {provider} response: {e}")))
}

/// A usable price is present and strictly positive.
pub(crate) fn require_price(price: Option<Decimal>, field: &str) -> Result<Decimal, ProviderError> {
    match price {
        Some(p) if p > Decimal::ZERO => Ok(p),
        Some(p) => Err(ProviderError::payload(format!("non-positive {field}: {p}"))),
        None => Err(ProviderError::payload(format!("missing {field}"))),
    }
}

pub(crate) fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Base URL of a loopback port with nothing listening on it.
#[cfg(test)]
pub(crate) fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
