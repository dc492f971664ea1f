use std::net::SocketAddr;

use anyhow::Context;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;

static EXPORTER: OnceCell<SocketAddr> = OnceCell::new();

/// Serves provider, fallback and refresh counters on `addr`.
///
/// The exporter is installed once per process. Later calls return `Ok`
/// without binding anything, even when they pass a different `addr`.
pub fn init_metrics_server(addr: SocketAddr) -> anyhow::Result<()> {
    EXPORTER.get_or_try_init(|| {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .with_context(|| format!("starting Prometheus exporter on {addr}"))?;
        Ok::<_, anyhow::Error>(addr)
    })?;
    Ok(())
}

// ── Provider metrics ─────────────────────────────────────────────

/// `outcome` is "hit" or the miss kind ("transport", "status", "payload").
pub fn record_provider_attempt(provider: &str, outcome: &str) {
    counter!("provider_attempts_total", "provider" => provider.to_string(), "outcome" => outcome.to_string())
        .increment(1);
}

pub fn record_provider_latency(provider: &str, latency_ms: f64) {
    histogram!("provider_latency_ms", "provider" => provider.to_string())
        .record(latency_ms);
}

// ── Resolver metrics ─────────────────────────────────────────────

pub fn record_synthetic_fallback() {
    counter!("synthetic_fallbacks_total").increment(1);
}

pub fn record_refresh_cycle() {
    counter!("refresh_cycles_total").increment(1);
}
