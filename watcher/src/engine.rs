//! Block-ingestion engine.
//!
//! Owns the current-block cursor. Each tick fetches the chain height, walks
//! every unseen block in ascending order, filters each block's transactions
//! against the subscription registry, and appends matches to the log. The
//! cursor advances only after a block is fully scanned, so a failed fetch
//! never skips past an unprocessed block.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chainwatch_gateway::{GatewayError, LedgerGateway};
use chainwatch_types::{Address, BlockHeight, Transaction};

use crate::log::TransactionLog;
use crate::metrics::WatcherMetrics;
use crate::registry::SubscriptionRegistry;

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// First successful cycle: the cursor was seeded to the chain's current
    /// height. No blocks were scanned.
    Seeded(BlockHeight),
    /// The chain has not advanced past the cursor.
    Idle,
    /// Every block in `(from, to]` was scanned and the cursor now sits at
    /// `to`.
    Advanced { from: BlockHeight, to: BlockHeight },
}

/// Single-writer cursor plus the fetch-filter-append pipeline.
///
/// One instance per service. The engine is the only writer of the cursor;
/// the registry and log are shared with request handlers and locked
/// independently per operation, so a transaction may be recorded for an
/// address moments after that address was subscribed.
pub struct IngestionEngine {
    gateway: Arc<dyn LedgerGateway>,
    registry: Arc<SubscriptionRegistry>,
    log: Arc<TransactionLog>,
    metrics: Arc<WatcherMetrics>,
    /// Highest block fully ingested. Only meaningful once `initialized`.
    cursor: AtomicU64,
    /// Whether the cursor has been seeded from the chain's height.
    ///
    /// Kept separate from the cursor value so a chain currently at height 0
    /// seeds correctly instead of re-seeding on every poll.
    initialized: AtomicBool,
}

impl IngestionEngine {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        registry: Arc<SubscriptionRegistry>,
        log: Arc<TransactionLog>,
        metrics: Arc<WatcherMetrics>,
    ) -> Self {
        Self {
            gateway,
            registry,
            log,
            metrics,
            cursor: AtomicU64::new(0),
            initialized: AtomicBool::new(false),
        }
    }

    /// Highest block fully ingested; 0 until the first successful poll.
    pub fn current_block(&self) -> BlockHeight {
        self.cursor.load(Ordering::Acquire)
    }

    /// Run one poll cycle.
    ///
    /// The very first successful cycle seeds the cursor to the chain's
    /// current height without scanning history; the engine only observes
    /// transactions from the moment it starts watching. Afterwards every
    /// block in `(cursor, height]` is processed in ascending order, the
    /// cursor advancing after each fully-scanned block. A gateway failure
    /// aborts the cycle with the cursor at the last fully-scanned block;
    /// the next cycle retries from there.
    pub async fn tick(&self) -> Result<TickOutcome, GatewayError> {
        let height = self.gateway.current_height().await?;

        if !self.initialized.load(Ordering::Acquire) {
            self.cursor.store(height, Ordering::Release);
            self.initialized.store(true, Ordering::Release);
            self.metrics.current_block.set(height as i64);
            tracing::info!(height, "cursor seeded to current chain height");
            return Ok(TickOutcome::Seeded(height));
        }

        let from = self.cursor.load(Ordering::Acquire);
        if height <= from {
            return Ok(TickOutcome::Idle);
        }

        for block in (from + 1)..=height {
            let matched = self.scan_block(block).await?;
            // Cursor update is the last action per block: a failure above
            // leaves this block unseen and the next tick rescans it.
            self.cursor.store(block, Ordering::Release);
            self.metrics.blocks_ingested.inc();
            self.metrics.current_block.set(block as i64);
            tracing::debug!(block, matched, "block ingested");
        }

        Ok(TickOutcome::Advanced { from, to: height })
    }

    /// Fetch and filter a single block without touching the cursor.
    ///
    /// Used by the subscribe-time catch-up path. May race with the poll
    /// loop over the same height, in which case matches are recorded twice.
    pub async fn process_block(&self, height: BlockHeight) -> Result<usize, GatewayError> {
        self.scan_block(height).await
    }

    /// Fetch `height`'s transactions and append every one that touches a
    /// subscribed address. Returns the number of appends.
    async fn scan_block(&self, height: BlockHeight) -> Result<usize, GatewayError> {
        let transactions = self.gateway.block_transactions(height).await?;
        let mut matched = 0;

        for tx in &transactions {
            // Sender and receiver are matched independently: a transfer
            // between two subscribed addresses lands in both logs.
            if let Some(from) = tx.from.as_deref() {
                matched += self.record_if_subscribed(from, tx);
            }
            if let Some(to) = tx.to.as_deref() {
                matched += self.record_if_subscribed(to, tx);
            }
        }

        if matched > 0 {
            self.metrics.transactions_matched.inc_by(matched as u64);
        }
        Ok(matched)
    }

    fn record_if_subscribed(&self, raw: &str, tx: &Transaction) -> usize {
        let address = Address::normalize(raw);
        if self.registry.is_subscribed(&address) {
            self.log.append(&address, tx.clone());
            1
        } else {
            0
        }
    }
}
