use std::sync::Arc;

use tokio::sync::watch;

use crate::state::snapshot::MarketSnapshot;

/// Holder of the one snapshot that is "current" at any time.
///
/// Cheap to clone (an `Arc` bump). Publishing replaces the previous value
/// wholesale and wakes every subscriber.
#[derive(Clone, Debug)]
pub struct CurrentSnapshot {
    tx: Arc<watch::Sender<MarketSnapshot>>,
}

impl CurrentSnapshot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MarketSnapshot::loading());
        Self { tx: Arc::new(tx) }
    }

    pub fn publish(&self, snapshot: MarketSnapshot) {
        // send_replace works without live receivers
        self.tx.send_replace(snapshot);
    }

    pub fn get(&self) -> MarketSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MarketSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for CurrentSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
