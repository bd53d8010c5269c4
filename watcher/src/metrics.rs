//! Prometheus metrics for the watcher.
//!
//! [`WatcherMetrics`] owns a dedicated [`Registry`] that the API's
//! `/metrics` endpoint encodes into the text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

/// Central collection of watcher metrics.
pub struct WatcherMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Blocks fully ingested by the poll loop.
    pub blocks_ingested: IntCounter,
    /// Transactions recorded into the per-address log.
    pub transactions_matched: IntCounter,
    /// Poll cycles aborted by a gateway failure.
    pub tick_failures: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Highest block fully ingested (the cursor).
    pub current_block: IntGauge,
    /// Number of subscribed addresses.
    pub subscribers: IntGauge,
}

impl WatcherMetrics {
    /// Create a fresh set of metrics registered under a new [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let blocks_ingested = register_int_counter_with_registry!(
            Opts::new(
                "chainwatch_blocks_ingested_total",
                "Blocks fully ingested by the poll loop"
            ),
            registry
        )
        .expect("metric registration on fresh registry");

        let transactions_matched = register_int_counter_with_registry!(
            Opts::new(
                "chainwatch_transactions_matched_total",
                "Transactions recorded for subscribed addresses"
            ),
            registry
        )
        .expect("metric registration on fresh registry");

        let tick_failures = register_int_counter_with_registry!(
            Opts::new(
                "chainwatch_tick_failures_total",
                "Poll cycles aborted by a gateway failure"
            ),
            registry
        )
        .expect("metric registration on fresh registry");

        let current_block = register_int_gauge_with_registry!(
            Opts::new("chainwatch_current_block", "Highest block fully ingested"),
            registry
        )
        .expect("metric registration on fresh registry");

        let subscribers = register_int_gauge_with_registry!(
            Opts::new("chainwatch_subscribers", "Number of subscribed addresses"),
            registry
        )
        .expect("metric registration on fresh registry");

        Self {
            registry,
            blocks_ingested,
            transactions_matched,
            tick_failures,
            current_block,
            subscribers,
        }
    }

    /// Encode all metrics in the Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&self.registry.gather(), &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for WatcherMetrics {
    fn default() -> Self {
        Self::new()
    }
}
