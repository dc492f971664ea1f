mod config;
mod dashboard;
mod format;
mod market_data;
mod metrics;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use market_data::adapters::build_providers;
use market_data::refresh::spawn_refresh;
use market_data::resolver::MarketDataResolver;

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_client(cfg: &Config) -> Result<Client> {
    let mut builder = Client::builder().user_agent(cfg.http.user_agent.clone());
    if let Some(timeout) = cfg.http.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("building HTTP client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env()?;
    init_tracing(&cfg.log_level);

    if let Some(addr) = cfg.metrics_addr {
        crate::metrics::prometheus::init_metrics_server(addr)?;
        info!(%addr, "prometheus exporter listening");
    }

    let client = build_client(&cfg)?;
    let providers = build_providers(&cfg.providers, &cfg.endpoints, client);
    let resolver = Arc::new(MarketDataResolver::new(providers, cfg.resolver.clone()));

    let label = format::short_address(&cfg.asset_id);
    info!(
        token = %label,
        providers = ?resolver.provider_kinds(),
        refresh_secs = cfg.refresh_interval.as_secs(),
        "token-market-feed starting"
    );

    let shutdown = CancellationToken::new();
    let refresh = spawn_refresh(
        resolver,
        cfg.asset_id.clone(),
        cfg.refresh_interval,
        shutdown.child_token(),
    );
    let dashboard = tokio::spawn(dashboard::run_dashboard(refresh.current().subscribe(), label));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl-C, shutting down"),
        Err(err) => warn!(error = %err, "failed to listen for Ctrl-C, shutting down"),
    }

    shutdown.cancel();
    let last = refresh.current().get();
    refresh.shutdown().await;
    info!(token = %cfg.asset_id, source = ?last.source, "final snapshot: {}", dashboard::render(&last));
    if let Err(err) = dashboard.await {
        warn!(error = %err, "dashboard task panicked");
    }

    Ok(())
}
