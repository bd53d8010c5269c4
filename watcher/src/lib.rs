//! chainwatch core — follows a remote chain node and records transactions
//! touching watched addresses.
//!
//! The watcher:
//! - Polls the node for its current height on a fixed interval
//! - Walks every unseen block in ascending order
//! - Matches each transaction's sender and receiver against the subscriber set
//! - Appends matches to a per-address transaction log
//! - Exposes subscribe/query operations safe to call from concurrent requests

pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod service;
pub mod shutdown;

pub use config::WatcherConfig;
pub use engine::{IngestionEngine, TickOutcome};
pub use error::WatcherError;
pub use log::TransactionLog;
pub use logging::{init_logging, LogFormat};
pub use metrics::WatcherMetrics;
pub use registry::SubscriptionRegistry;
pub use service::WatcherService;
pub use shutdown::ShutdownController;
