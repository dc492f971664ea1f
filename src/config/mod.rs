use std::net::SocketAddr;
use std::ops::Range;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use rust_decimal::Decimal;

use crate::market_data::types::ProviderKind;

/// On-chain address of the token the dashboard tracks.
pub const DEFAULT_ASSET_ID: &str = "DmQ6ZD1HGACksWNc4md4RwyB4MgCVah8oFL1XEdGmoon";
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub asset_id: String,
    pub refresh_interval: Duration,
    /// Providers in priority order.
    pub providers: Vec<ProviderKind>,
    pub metrics_addr: Option<SocketAddr>,
    pub http: HttpCfg,
    pub endpoints: EndpointCfg,
    pub resolver: ResolverCfg,
}

#[derive(Debug, Clone)]
pub struct HttpCfg {
    pub user_agent: String,
    /// `None` leaves reqwest's default in place (no request timeout).
    pub timeout: Option<Duration>,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            user_agent: concat!("token-market-feed/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EndpointCfg {
    pub dexscreener_url: String,
    pub coingecko_url: String,
    pub coingecko_platform: String,
    pub coingecko_api_key: Option<String>,
    pub solscan_url: String,
}

impl Default for EndpointCfg {
    fn default() -> Self {
        Self {
            dexscreener_url: "https://api.dexscreener.com".to_string(),
            coingecko_url: "https://api.coingecko.com".to_string(),
            coingecko_platform: "solana".to_string(),
            coingecko_api_key: None,
            solscan_url: "https://api.solscan.io".to_string(),
        }
    }
}

/// Numbers the resolver uses to complete partial quotes and to synthesize
/// a snapshot when every provider misses.
#[derive(Debug, Clone)]
pub struct ResolverCfg {
    /// Used to derive market cap when a provider does not report one.
    pub circulating_supply: Decimal,
    /// Holder count used when a provider does not report one.
    pub placeholder_holders: u64,
    /// Centre of the synthetic price.
    pub base_price: Decimal,
    /// Synthetic price varies by up to this fraction either way.
    pub max_jitter: f64,
    pub synthetic_holders: Range<u64>,
    /// Fixes the synthetic sequence; `None` seeds from OS entropy.
    pub synthetic_seed: Option<u64>,
}

impl Default for ResolverCfg {
    fn default() -> Self {
        Self {
            circulating_supply: Decimal::from(10_000_000_000_000u64),
            placeholder_holders: 2485,
            base_price: Decimal::new(768, 9),
            max_jitter: 0.10,
            synthetic_holders: 2400..2600,
            synthetic_seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // dotenvy loads .env, but doesn't override already-set env vars
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_level = var("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let asset_id = var("TOKEN_ASSET_ID").unwrap_or_else(|| DEFAULT_ASSET_ID.to_string());

        let refresh_interval = match var("TOKEN_REFRESH_SECS") {
            Some(raw) => Duration::from_secs(parse(&raw, "TOKEN_REFRESH_SECS")?),
            None => DEFAULT_REFRESH,
        };

        let providers = match var("TOKEN_PROVIDERS") {
            Some(raw) => raw
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(ProviderKind::from_str)
                .collect::<anyhow::Result<Vec<_>>>()
                .context("parsing TOKEN_PROVIDERS")?,
            None => ProviderKind::DEFAULT_CHAIN.to_vec(),
        };

        let metrics_addr = var("TOKEN_METRICS_ADDR")
            .map(|raw| parse::<SocketAddr>(&raw, "TOKEN_METRICS_ADDR"))
            .transpose()?;

        let mut http = HttpCfg::default();
        if let Some(ua) = var("TOKEN_USER_AGENT") {
            http.user_agent = ua;
        }
        if let Some(raw) = var("TOKEN_HTTP_TIMEOUT_SECS") {
            http.timeout = Some(Duration::from_secs(parse(&raw, "TOKEN_HTTP_TIMEOUT_SECS")?));
        }

        let mut endpoints = EndpointCfg::default();
        if let Some(url) = var("DEXSCREENER_URL") {
            endpoints.dexscreener_url = url;
        }
        if let Some(url) = var("COINGECKO_URL") {
            endpoints.coingecko_url = url;
        }
        if let Some(platform) = var("COINGECKO_PLATFORM") {
            endpoints.coingecko_platform = platform;
        }
        endpoints.coingecko_api_key = var("COINGECKO_API_KEY");
        if let Some(url) = var("SOLSCAN_URL") {
            endpoints.solscan_url = url;
        }

        let mut resolver = ResolverCfg::default();
        if let Some(raw) = var("TOKEN_FALLBACK_PRICE") {
            resolver.base_price = parse(&raw, "TOKEN_FALLBACK_PRICE")?;
        }
        if let Some(raw) = var("TOKEN_CIRCULATING_SUPPLY") {
            resolver.circulating_supply = parse(&raw, "TOKEN_CIRCULATING_SUPPLY")?;
        }
        if let Some(raw) = var("TOKEN_PLACEHOLDER_HOLDERS") {
            resolver.placeholder_holders = parse(&raw, "TOKEN_PLACEHOLDER_HOLDERS")?;
        }
        resolver.synthetic_seed = var("TOKEN_SYNTHETIC_SEED")
            .map(|raw| parse::<u64>(&raw, "TOKEN_SYNTHETIC_SEED"))
            .transpose()?;

        let cfg = Self {
            log_level,
            asset_id,
            refresh_interval,
            providers,
            metrics_addr,
            http,
            endpoints,
            resolver,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.asset_id.trim().is_empty(), "TOKEN_ASSET_ID must not be empty");
        anyhow::ensure!(
            !self.refresh_interval.is_zero(),
            "TOKEN_REFRESH_SECS must be > 0"
        );
        anyhow::ensure!(!self.providers.is_empty(), "TOKEN_PROVIDERS must not be empty");
        self.resolver.validate()
    }
}

impl ResolverCfg {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.base_price > Decimal::ZERO,
            "fallback price must be > 0"
        );
        anyhow::ensure!(
            self.circulating_supply > Decimal::ZERO,
            "circulating supply must be > 0"
        );
        anyhow::ensure!(
            (0.0..1.0).contains(&self.max_jitter),
            "synthetic jitter must be in [0, 1)"
        );
        anyhow::ensure!(
            !self.synthetic_holders.is_empty(),
            "synthetic holder range must not be empty"
        );
        Ok(())
    }
}

fn parse<T>(raw: &str, key: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("invalid value for {key}: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_dashboard_literals() {
        let cfg = cfg_from(&[]).unwrap();
        assert_eq!(cfg.asset_id, DEFAULT_ASSET_ID);
        assert_eq!(cfg.refresh_interval, Duration::from_secs(60));
        assert_eq!(cfg.providers, ProviderKind::DEFAULT_CHAIN.to_vec());
        assert_eq!(cfg.metrics_addr, None);
        assert_eq!(cfg.http.timeout, None);
        assert_eq!(cfg.resolver.base_price, Decimal::from_str("0.000000768").unwrap());
        assert_eq!(cfg.resolver.circulating_supply, Decimal::from(10_000_000_000_000u64));
        assert_eq!(cfg.resolver.synthetic_holders, 2400..2600);
        assert_eq!(cfg.resolver.placeholder_holders, 2485);
        assert_eq!(cfg.resolver.synthetic_seed, None);
        assert_eq!(cfg.endpoints.coingecko_platform, "solana");
        assert_eq!(cfg.endpoints.coingecko_api_key, None);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = cfg_from(&[
            ("TOKEN_ASSET_ID", "X1"),
            ("TOKEN_REFRESH_SECS", "300"),
            ("TOKEN_PROVIDERS", "solscan, dexscreener"),
            ("TOKEN_METRICS_ADDR", "127.0.0.1:9000"),
            ("TOKEN_HTTP_TIMEOUT_SECS", "5"),
            ("COINGECKO_API_KEY", "demo"),
            ("TOKEN_FALLBACK_PRICE", "0.000001"),
            ("TOKEN_SYNTHETIC_SEED", "42"),
        ])
        .unwrap();

        assert_eq!(cfg.asset_id, "X1");
        assert_eq!(cfg.refresh_interval, Duration::from_secs(300));
        assert_eq!(cfg.providers, vec![ProviderKind::Solscan, ProviderKind::DexScreener]);
        assert_eq!(cfg.metrics_addr, Some("127.0.0.1:9000".parse().unwrap()));
        assert_eq!(cfg.http.timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.endpoints.coingecko_api_key.as_deref(), Some("demo"));
        assert_eq!(cfg.resolver.base_price, Decimal::from_str("0.000001").unwrap());
        assert_eq!(cfg.resolver.synthetic_seed, Some(42));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = cfg_from(&[("TOKEN_ASSET_ID", "  "), ("COINGECKO_API_KEY", "")]).unwrap();
        assert_eq!(cfg.asset_id, DEFAULT_ASSET_ID);
        assert_eq!(cfg.endpoints.coingecko_api_key, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(cfg_from(&[("TOKEN_REFRESH_SECS", "0")]).is_err());
        assert!(cfg_from(&[("TOKEN_REFRESH_SECS", "soon")]).is_err());
        assert!(cfg_from(&[("TOKEN_PROVIDERS", "dexscreener,birdeye")]).is_err());
        assert!(cfg_from(&[("TOKEN_PROVIDERS", ",")]).is_err());
        assert!(cfg_from(&[("TOKEN_FALLBACK_PRICE", "0")]).is_err());
        assert!(cfg_from(&[("TOKEN_METRICS_ADDR", "not-an-addr")]).is_err());
        assert!(cfg_from(&[("TOKEN_SYNTHETIC_SEED", "-1")]).is_err());
    }

    #[test]
    fn resolver_cfg_validation() {
        let mut cfg = ResolverCfg::default();
        assert!(cfg.validate().is_ok());

        cfg.max_jitter = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = ResolverCfg::default();
        cfg.synthetic_holders = 10..10;
        assert!(cfg.validate().is_err());
    }
}
