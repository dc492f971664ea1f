use rust_decimal::Decimal;

use crate::market_data::types::ProviderKind;

/// Where the numbers in a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Placeholder published before the first resolution.
    Pending,
    Provider(ProviderKind),
    /// Generated locally because no provider answered.
    Synthetic,
}

/// The full set of market fields displayed at a given moment.
/// Always replaced as a whole, never patched field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub price: Decimal,
    pub market_cap: Decimal,
    pub holder_count: u64,
    pub is_loading: bool,
    pub source: SnapshotSource,
}

impl MarketSnapshot {
    pub fn loading() -> Self {
        Self {
            price: Decimal::ZERO,
            market_cap: Decimal::ZERO,
            holder_count: 0,
            is_loading: true,
            source: SnapshotSource::Pending,
        }
    }
}
