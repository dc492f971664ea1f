use tokio::sync::watch;
use tracing::{info, warn};

use crate::format::FormattedSnapshot;
use crate::state::snapshot::{MarketSnapshot, SnapshotSource};

/// Shown next to the numbers whenever they are not live.
pub const ESTIMATED_NOTICE: &str = "live market data unavailable, showing estimated values";

/// One line of dashboard output for a snapshot.
pub fn render(snapshot: &MarketSnapshot) -> String {
    if snapshot.is_loading {
        return "price: loading...  market cap: loading...  holders: loading...".to_string();
    }
    let formatted = FormattedSnapshot::from(snapshot);
    format!(
        "price: {}  market cap: {}  holders: {}",
        formatted.price, formatted.market_cap, formatted.holders
    )
}

/// Logs every published snapshot until the sender side goes away.
/// Stand-in for the page's price widget.
pub async fn run_dashboard(mut rx: watch::Receiver<MarketSnapshot>, label: String) {
    loop {
        let snapshot = rx.borrow_and_update().clone();
        let line = render(&snapshot);

        match snapshot.source {
            SnapshotSource::Synthetic => {
                warn!(token = %label, notice = ESTIMATED_NOTICE, "{line}");
            }
            SnapshotSource::Provider(provider) => {
                info!(token = %label, %provider, "{line}");
            }
            SnapshotSource::Pending => {
                info!(token = %label, "{line}");
            }
        }

        if rx.changed().await.is_err() {
            break;
        }
    }

    info!("snapshot channel closed, dashboard shutting down");
}
