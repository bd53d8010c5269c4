//! Nullable infrastructure for deterministic testing.
//!
//! The watcher's only external dependency, the chain node, sits behind
//! the `LedgerGateway` trait. This crate provides [`NullGateway`], a
//! scripted in-memory implementation that never touches the network and
//! can be programmed per test: height answers, per-block transaction
//! lists, and injected failures.

pub mod gateway;

pub use gateway::{transfer, NullGateway};
