//! Subscription registry — the set of watched addresses.
//!
//! Grow-only: once subscribed, an address is watched for the lifetime of
//! the process; no removal operation exists. Shared between the ingestion
//! engine (a membership test per scanned transaction) and request handlers
//! (inserts), so access goes through a read-write lock held only for the
//! single set operation.

use std::collections::HashSet;
use std::sync::RwLock;

use chainwatch_types::Address;

/// Concurrency-safe set of normalized addresses.
pub struct SubscriptionRegistry {
    addresses: RwLock<HashSet<Address>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            addresses: RwLock::new(HashSet::new()),
        }
    }

    /// Add an address to the watched set.
    ///
    /// Returns `true` if the address was newly inserted, `false` if it was
    /// already subscribed. Idempotent: a repeated call leaves state
    /// unchanged.
    pub fn subscribe(&self, address: Address) -> bool {
        self.addresses
            .write()
            .expect("subscription registry lock poisoned")
            .insert(address)
    }

    /// Whether an address is in the watched set.
    pub fn is_subscribed(&self, address: &Address) -> bool {
        self.addresses
            .read()
            .expect("subscription registry lock poisoned")
            .contains(address)
    }

    /// Number of subscribed addresses.
    pub fn len(&self) -> usize {
        self.addresses
            .read()
            .expect("subscription registry lock poisoned")
            .len()
    }

    /// Whether no address has been subscribed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
