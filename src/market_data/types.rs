use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// External market-data sources the resolver knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    DexScreener,
    CoinGecko,
    CoinGeckoSimple,
    Solscan,
}

impl ProviderKind {
    /// Chain used when no explicit ordering is configured.
    pub const DEFAULT_CHAIN: [ProviderKind; 3] = [
        ProviderKind::DexScreener,
        ProviderKind::CoinGecko,
        ProviderKind::Solscan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::DexScreener => "dexscreener",
            ProviderKind::CoinGecko => "coingecko",
            ProviderKind::CoinGeckoSimple => "coingecko_simple",
            ProviderKind::Solscan => "solscan",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dexscreener" => Ok(ProviderKind::DexScreener),
            "coingecko" => Ok(ProviderKind::CoinGecko),
            "coingecko_simple" => Ok(ProviderKind::CoinGeckoSimple),
            "solscan" => Ok(ProviderKind::Solscan),
            other => anyhow::bail!("unknown market data provider: {other}"),
        }
    }
}

/// What a single provider returned before the resolver fills in the gaps.
/// Only the price is mandatory; everything else is best effort.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderQuote {
    pub price: Decimal,
    pub market_cap: Option<Decimal>,
    pub holders: Option<u64>,
}

impl ProviderQuote {
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            market_cap: None,
            holders: None,
        }
    }

    pub fn with_market_cap(mut self, market_cap: Option<Decimal>) -> Self {
        // Some providers report 0 for unknown caps
        self.market_cap = market_cap.filter(|cap| cap.is_sign_positive() && !cap.is_zero());
        self
    }

    pub fn with_holders(mut self, holders: Option<u64>) -> Self {
        // A reported count of 0 means the provider doesn't know
        self.holders = holders.filter(|count| *count > 0);
        self
    }
}
