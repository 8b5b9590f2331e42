//! Per-client poll loop.
//!
//! # Design
//! - One tokio task per configured client, ticking on a fixed interval.
//! - A failed poll is logged and the loop waits for the next tick.
//! - Tasks run until aborted by the bootstrap on shutdown.

use std::sync::Arc;
use std::time::Duration;

use seedwarden_core::TorrentClientProxy;
use seedwarden_engine::ReconciliationEngine;
use seedwarden_telemetry::MetricsSnapshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Run one poll and log its outcome.
///
/// Returns the number of reported items, or `None` when the poll failed.
pub(crate) async fn poll_once<P>(engine: &ReconciliationEngine<P>) -> Option<usize>
where
    P: TorrentClientProxy,
{
    let client = engine.settings().client.as_str();
    let reported = match engine.get_items().await {
        Ok(items) => {
            let removable = items.iter().filter(|item| item.can_be_removed).count();
            info!(client, count = items.len(), removable, "queue polled");
            Some(items.len())
        }
        Err(err) => {
            warn!(client, error = %err, "queue poll failed");
            None
        }
    };
    report_counters(engine);
    reported
}

/// Log the counters accumulated for the engine's client and return them.
pub(crate) fn report_counters<P>(engine: &ReconciliationEngine<P>) -> MetricsSnapshot
where
    P: TorrentClientProxy,
{
    let client = engine.settings().client.as_str();
    let snapshot = engine.metrics().snapshot(client);
    debug!(
        client,
        polls_total = snapshot.polls_total,
        poll_failures_total = snapshot.poll_failures_total,
        items_reported = snapshot.items_reported,
        skipped_metadata_pending = snapshot.skipped_metadata_pending,
        skipped_out_of_scope = snapshot.skipped_out_of_scope,
        submissions_total = snapshot.submissions_total,
        "client counters"
    );
    snapshot
}

/// Spawn the poll loop for `engine`, polling immediately and then every `every`.
pub(crate) fn spawn_poller<P>(
    engine: Arc<ReconciliationEngine<P>>,
    every: Duration,
) -> JoinHandle<()>
where
    P: TorrentClientProxy + 'static,
{
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            poll_once(&engine).await;
        }
    })
}
