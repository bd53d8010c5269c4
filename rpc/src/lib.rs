//! HTTP API for chainwatch.
//!
//! Endpoints:
//! - `POST /subscribe`: watch an address
//! - `GET /transactions?address=...`: recorded transactions for an address
//! - `GET /currentBlock`: highest fully-ingested block
//! - `GET /metrics`: Prometheus exposition (when enabled in config)
//!
//! Addresses are opaque strings at this boundary; only presence is
//! validated here. Normalization and matching live in the watcher core.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::RpcServer;
