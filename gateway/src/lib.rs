//! Gateway to the remote chain node.
//!
//! The ingestion engine asks the node exactly two questions: "what is the
//! current height" and "what transactions are in block N". Those two calls
//! form the [`LedgerGateway`] trait; the production implementation,
//! [`JsonRpcGateway`], speaks Ethereum JSON-RPC over HTTP POST.
//!
//! Retry and backoff are deliberately absent: the engine's poll cadence is
//! the retry loop, and a failed call simply means no progress this interval.

pub mod client;
pub mod error;

pub use client::{parse_quantity, JsonRpcGateway};
pub use error::GatewayError;

use async_trait::async_trait;
use chainwatch_types::{BlockHeight, Transaction};

/// The watcher's view of the remote node.
///
/// Kept as a trait so the engine can be driven by a scripted in-memory
/// implementation in tests.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Current height of the chain.
    async fn current_height(&self) -> Result<BlockHeight, GatewayError>;

    /// Transactions contained in the block at `height`.
    async fn block_transactions(
        &self,
        height: BlockHeight,
    ) -> Result<Vec<Transaction>, GatewayError>;
}
