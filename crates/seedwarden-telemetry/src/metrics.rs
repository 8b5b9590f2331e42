//! Prometheus-backed metrics for the reconciliation loop.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Every collector is labelled by client name so several daemons can share one registry.

use std::sync::Arc;

use prometheus::core::Collector;
use prometheus::{Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Reason label recorded when an item is left out of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Magnet still resolving its name and size.
    MetadataPending,
    /// Stored outside the configured directory or category.
    OutOfScope,
}

impl SkipReason {
    /// Label value used in the exposition output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MetadataPending => "metadata_pending",
            Self::OutOfScope => "out_of_scope",
        }
    }
}

/// Prometheus-backed metrics registry shared across pollers.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    polls_total: IntCounterVec,
    poll_failures_total: IntCounterVec,
    items_reported: IntGaugeVec,
    items_skipped_total: IntCounterVec,
    submissions_total: IntCounterVec,
}

/// Point-in-time view of one client's collectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Completed polls, successful or not.
    pub polls_total: u64,
    /// Polls that failed at the proxy boundary.
    pub poll_failures_total: u64,
    /// Items in the most recent snapshot.
    pub items_reported: i64,
    /// Items skipped because metadata was still pending.
    pub skipped_metadata_pending: u64,
    /// Items skipped because they fell outside the scope.
    pub skipped_out_of_scope: u64,
    /// Torrents handed to the daemon.
    pub submissions_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be built or
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let polls_total = counter_vec(
            "seedwarden_polls_total",
            "Download client polls performed",
            &["client"],
        )?;
        let poll_failures_total = counter_vec(
            "seedwarden_poll_failures_total",
            "Download client polls that failed",
            &["client"],
        )?;
        let items_reported = IntGaugeVec::new(
            Opts::new(
                "seedwarden_items_reported",
                "Queue items reported by the latest poll",
            ),
            &["client"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "seedwarden_items_reported",
            source,
        })?;
        let items_skipped_total = counter_vec(
            "seedwarden_items_skipped_total",
            "Queue items left out of a snapshot by reason",
            &["client", "reason"],
        )?;
        let submissions_total = counter_vec(
            "seedwarden_submissions_total",
            "Torrents submitted to the download client",
            &["client"],
        )?;

        register(&registry, "seedwarden_polls_total", &polls_total)?;
        register(
            &registry,
            "seedwarden_poll_failures_total",
            &poll_failures_total,
        )?;
        register(&registry, "seedwarden_items_reported", &items_reported)?;
        register(
            &registry,
            "seedwarden_items_skipped_total",
            &items_skipped_total,
        )?;
        register(&registry, "seedwarden_submissions_total", &submissions_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                polls_total,
                poll_failures_total,
                items_reported,
                items_skipped_total,
                submissions_total,
            }),
        })
    }

    /// Record a successful poll and the number of items it reported.
    pub fn record_poll(&self, client: &str, reported: usize) {
        self.inner.polls_total.with_label_values(&[client]).inc();
        self.inner
            .items_reported
            .with_label_values(&[client])
            .set(i64::try_from(reported).unwrap_or(i64::MAX));
    }

    /// Record a poll that failed at the proxy boundary.
    pub fn record_poll_failure(&self, client: &str) {
        self.inner.polls_total.with_label_values(&[client]).inc();
        self.inner
            .poll_failures_total
            .with_label_values(&[client])
            .inc();
    }

    /// Count an item left out of a snapshot.
    pub fn inc_skipped(&self, client: &str, reason: SkipReason) {
        self.inner
            .items_skipped_total
            .with_label_values(&[client, reason.as_str()])
            .inc();
    }

    /// Count a torrent submitted to the daemon.
    pub fn inc_submission(&self, client: &str) {
        self.inner
            .submissions_total
            .with_label_values(&[client])
            .inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the collectors for `client`.
    #[must_use]
    pub fn snapshot(&self, client: &str) -> MetricsSnapshot {
        let skipped = |reason: SkipReason| {
            self.inner
                .items_skipped_total
                .with_label_values(&[client, reason.as_str()])
                .get()
        };
        MetricsSnapshot {
            polls_total: self.inner.polls_total.with_label_values(&[client]).get(),
            poll_failures_total: self
                .inner
                .poll_failures_total
                .with_label_values(&[client])
                .get(),
            items_reported: self.inner.items_reported.with_label_values(&[client]).get(),
            skipped_metadata_pending: skipped(SkipReason::MetadataPending),
            skipped_out_of_scope: skipped(SkipReason::OutOfScope),
            submissions_total: self
                .inner
                .submissions_total
                .with_label_values(&[client])
                .get(),
        }
    }
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::MetricsCollector { name, source })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_updates_per_client() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.record_poll("seedbox", 4);
        metrics.record_poll("seedbox", 3);
        metrics.record_poll_failure("seedbox");
        metrics.inc_skipped("seedbox", SkipReason::MetadataPending);
        metrics.inc_skipped("seedbox", SkipReason::OutOfScope);
        metrics.inc_skipped("seedbox", SkipReason::OutOfScope);
        metrics.inc_submission("seedbox");
        metrics.record_poll("nas", 9);

        let snapshot = metrics.snapshot("seedbox");
        assert_eq!(
            snapshot,
            MetricsSnapshot {
                polls_total: 3,
                poll_failures_total: 1,
                items_reported: 3,
                skipped_metadata_pending: 1,
                skipped_out_of_scope: 2,
                submissions_total: 1,
            }
        );
        assert_eq!(metrics.snapshot("nas").items_reported, 9);
        Ok(())
    }

    #[test]
    fn render_includes_labelled_series() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.record_poll("seedbox", 1);
        metrics.inc_skipped("seedbox", SkipReason::MetadataPending);

        let rendered = metrics.render()?;
        assert!(rendered.contains("seedwarden_polls_total{client=\"seedbox\"} 1"));
        assert!(rendered.contains("reason=\"metadata_pending\""));
        Ok(())
    }
}
