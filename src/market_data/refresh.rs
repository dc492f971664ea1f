use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::market_data::resolver::MarketDataResolver;
use crate::metrics::prometheus::record_refresh_cycle;
use crate::state::current::CurrentSnapshot;

/// A running refresh loop. Dropping the handle cancels the loop; call
/// [`RefreshHandle::shutdown`] to also wait for it to finish.
pub struct RefreshHandle {
    current: CurrentSnapshot,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    _guard: DropGuard,
}

impl RefreshHandle {
    pub fn current(&self) -> &CurrentSnapshot {
        &self.current
    }

    /// Cancels the loop and waits for it. Once this returns the resolver
    /// is not called again and nothing more is published.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            warn!(error = %err, "refresh task panicked");
        }
    }
}

/// Publishes a loading snapshot, then resolves immediately and again on
/// every `interval` tick until `cancel` fires.
pub fn spawn_refresh(
    resolver: Arc<MarketDataResolver>,
    asset_id: String,
    interval: Duration,
    cancel: CancellationToken,
) -> RefreshHandle {
    let current = CurrentSnapshot::new();
    let task = tokio::spawn(run_refresh(
        resolver,
        asset_id,
        interval,
        current.clone(),
        cancel.clone(),
    ));

    RefreshHandle {
        current,
        _guard: cancel.clone().drop_guard(),
        cancel,
        task,
    }
}

async fn run_refresh(
    resolver: Arc<MarketDataResolver>,
    asset_id: String,
    interval: Duration,
    current: CurrentSnapshot,
    cancel: CancellationToken,
) {
    info!(asset_id = %asset_id, interval_secs = interval.as_secs(), "refresh task started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // An in-flight resolution is dropped on cancel, never published
        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            snapshot = resolver.resolve(&asset_id) => snapshot,
        };
        if cancel.is_cancelled() {
            break;
        }

        debug!(?snapshot, "publishing snapshot");
        record_refresh_cycle();
        current.publish(snapshot);
    }

    info!(asset_id = %asset_id, "refresh task stopped");
}
