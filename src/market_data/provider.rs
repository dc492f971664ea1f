use async_trait::async_trait;

use super::error::ProviderError;
use super::types::{ProviderKind, ProviderQuote};

/// Trait that every market-data source implements.
///
/// One call is one attempt: implementations never retry internally, and
/// every failure comes back as a classified [`ProviderError`] so the
/// resolver can move on to the next source.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn fetch_quote(&self, asset_id: &str) -> Result<ProviderQuote, ProviderError>;
}
