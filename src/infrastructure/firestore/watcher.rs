//! Live snapshot watcher.
//!
//! Re-reads the collection on a fixed interval and delivers a snapshot
//! whenever the content changed since the last delivery. The first read is
//! always delivered. The first failed read is delivered as an error and ends
//! the subscription.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::domain::errors::StoreError;
use crate::domain::ports::{Snapshot, SnapshotEvent, Subscription, SubscriptionHandle};

/// Something that can read a full collection listing.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    /// Reads the whole collection once.
    async fn fetch(&self, collection: &str) -> Result<Snapshot, StoreError>;
}

/// Starts the watcher task and returns its subscription.
pub fn spawn_watcher<S: SnapshotSource>(
    source: S,
    collection: String,
    poll_interval: Duration,
) -> Subscription {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let active = Arc::new(AtomicBool::new(true));

    let task = tokio::spawn(run_watch_loop(
        source,
        collection,
        poll_interval,
        event_tx,
        active.clone(),
    ));

    Subscription::new(event_rx, SubscriptionHandle::new(active, task))
}

async fn run_watch_loop<S: SnapshotSource>(
    source: S,
    collection: String,
    poll_interval: Duration,
    event_tx: mpsc::UnboundedSender<SnapshotEvent>,
    active: Arc<AtomicBool>,
) {
    info!(collection = %collection, interval_ms = poll_interval.as_millis(), "Watcher started");

    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_delivered: Option<Snapshot> = None;

    while active.load(Ordering::SeqCst) {
        ticker.tick().await;

        match source.fetch(&collection).await {
            Ok(snapshot) => {
                if last_delivered.as_ref() == Some(&snapshot) {
                    continue;
                }
                debug!(collection = %collection, count = snapshot.len(), "Collection changed");
                if event_tx
                    .send(SnapshotEvent::Snapshot(snapshot.clone()))
                    .is_err()
                {
                    debug!("Subscriber gone, stopping watcher");
                    break;
                }
                last_delivered = Some(snapshot);
            }
            Err(e) => {
                warn!(collection = %collection, error = %e, "Watcher read failed, subscription ends");
                let _ = event_tx.send(SnapshotEvent::Error(e));
                break;
            }
        }
    }

    active.store(false, Ordering::SeqCst);
    info!(collection = %collection, "Watcher stopped");
}
