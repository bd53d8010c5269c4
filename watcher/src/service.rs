//! Service facade — composes registry, log, engine, and the poll loop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use chainwatch_gateway::LedgerGateway;
use chainwatch_types::{Address, BlockHeight, Transaction};

use crate::config::WatcherConfig;
use crate::engine::{IngestionEngine, TickOutcome};
use crate::error::WatcherError;
use crate::log::TransactionLog;
use crate::metrics::WatcherMetrics;
use crate::registry::SubscriptionRegistry;
use crate::shutdown::ShutdownController;

/// The operations callers invoke, composed over the core structures.
///
/// Nothing here is global: every piece of state is owned by the service
/// instance, so tests construct as many independent watchers as they need.
pub struct WatcherService {
    registry: Arc<SubscriptionRegistry>,
    log: Arc<TransactionLog>,
    engine: Arc<IngestionEngine>,
    gateway: Arc<dyn LedgerGateway>,
    metrics: Arc<WatcherMetrics>,
    shutdown: Arc<ShutdownController>,
    poll_interval: Duration,
    catch_up_on_subscribe: bool,
    /// Handle for the spawned ingestion loop (joined during shutdown).
    ingest_handle: Mutex<Option<JoinHandle<()>>>,
}

impl WatcherService {
    /// Create a service over `gateway` using `config`'s pacing options.
    pub fn new(config: &WatcherConfig, gateway: Arc<dyn LedgerGateway>) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let log = Arc::new(TransactionLog::new());
        let metrics = Arc::new(WatcherMetrics::new());
        let engine = Arc::new(IngestionEngine::new(
            Arc::clone(&gateway),
            Arc::clone(&registry),
            Arc::clone(&log),
            Arc::clone(&metrics),
        ));

        Self {
            registry,
            log,
            engine,
            gateway,
            metrics,
            shutdown: Arc::new(ShutdownController::new()),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            catch_up_on_subscribe: config.catch_up_on_subscribe,
            ingest_handle: Mutex::new(None),
        }
    }

    /// The shutdown controller driving this service's background tasks.
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Metrics owned by this service.
    pub fn metrics(&self) -> Arc<WatcherMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Spawn the periodic ingestion loop.
    ///
    /// One tick per interval, never overlapping: a tick completes all its
    /// per-block work before the next sleep begins. Gateway failures are
    /// logged and degrade to "no progress this interval"; the loop itself
    /// never exits except on shutdown.
    pub fn start(&self) {
        let engine = Arc::clone(&self.engine);
        let metrics = Arc::clone(&self.metrics);
        let mut shutdown_rx = self.shutdown.subscribe();
        let period = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        tracing::info!("ingestion loop shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match engine.tick().await {
                            Ok(TickOutcome::Advanced { from, to }) => {
                                tracing::debug!(from, to, "ingested new blocks");
                            }
                            Ok(_) => {}
                            Err(e) => {
                                metrics.tick_failures.inc();
                                tracing::warn!(error = %e, "poll cycle failed, retrying next interval");
                            }
                        }
                    }
                }
            }
        });

        *self
            .ingest_handle
            .lock()
            .expect("ingest handle lock poisoned") = Some(handle);
    }

    /// Stop the ingestion loop and wait for it to exit.
    pub async fn stop(&self) -> Result<(), WatcherError> {
        self.shutdown.shutdown();
        let handle = self
            .ingest_handle
            .lock()
            .expect("ingest handle lock poisoned")
            .take();
        if let Some(handle) = handle {
            handle
                .await
                .map_err(|e| WatcherError::Task(e.to_string()))?;
        }
        Ok(())
    }

    /// Watch an address.
    ///
    /// Returns `true` on a new subscription, `false` if the address was
    /// already watched. A new subscription is immediately backfilled
    /// against the latest block (best effort: a gateway failure here is
    /// logged, not surfaced, and the poll loop covers the address from the
    /// next block onward).
    pub async fn subscribe(&self, address: &str) -> bool {
        let normalized = Address::normalize(address);
        let newly = self.registry.subscribe(normalized.clone());
        if newly {
            self.metrics.subscribers.set(self.registry.len() as i64);
            tracing::info!(address = %normalized, "address subscribed");
            if self.catch_up_on_subscribe {
                self.catch_up(&normalized).await;
            }
        }
        newly
    }

    /// Scan the latest block once so a fresh subscriber sees current
    /// activity without waiting a full poll interval. Does not touch the
    /// cursor; may race with the poll loop over the same height.
    async fn catch_up(&self, address: &Address) {
        match self.gateway.current_height().await {
            Ok(height) => {
                if let Err(e) = self.engine.process_block(height).await {
                    tracing::warn!(%address, height, error = %e, "subscribe-time catch-up failed");
                }
            }
            Err(e) => {
                tracing::warn!(%address, error = %e, "could not fetch height for catch-up");
            }
        }
    }

    /// Recorded transactions for an address, oldest first. Empty for an
    /// address that never matched, or was never subscribed.
    pub fn transactions(&self, address: &str) -> Vec<Transaction> {
        self.log.get(&Address::normalize(address))
    }

    /// Highest block fully ingested (0 until the first successful poll).
    pub fn current_block(&self) -> BlockHeight {
        self.engine.current_block()
    }
}
