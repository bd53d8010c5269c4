//! Per-address transaction log.
//!
//! Append-only: transactions are recorded in discovery order (ascending
//! block height, node-reported order within a block) and never removed or
//! deduplicated. Reads return a cloned snapshot so callers never observe
//! the lock while the engine appends.

use std::collections::HashMap;
use std::sync::RwLock;

use chainwatch_types::{Address, Transaction};

/// Concurrency-safe mapping from address to its recorded transactions.
pub struct TransactionLog {
    entries: RwLock<HashMap<Address, Vec<Transaction>>>,
}

impl TransactionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Append a transaction to an address's sequence, creating the sequence
    /// if absent. No deduplication.
    pub fn append(&self, address: &Address, transaction: Transaction) {
        self.entries
            .write()
            .expect("transaction log lock poisoned")
            .entry(address.clone())
            .or_default()
            .push(transaction);
    }

    /// Snapshot of an address's recorded transactions.
    ///
    /// An address with no entries yet is indistinguishable from an
    /// unsubscribed one: both return an empty vector, never an error.
    pub fn get(&self, address: &Address) -> Vec<Transaction> {
        self.entries
            .read()
            .expect("transaction log lock poisoned")
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of addresses with at least one recorded transaction.
    pub fn address_count(&self) -> usize {
        self.entries
            .read()
            .expect("transaction log lock poisoned")
            .len()
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(hash: &str) -> Transaction {
        Transaction {
            hash: Some(hash.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn unknown_address_yields_empty_snapshot() {
        let log = TransactionLog::new();
        assert!(log.get(&Address::normalize("0xdead")).is_empty());
        assert_eq!(log.address_count(), 0);
    }

    #[test]
    fn append_preserves_insertion_order() {
        let log = TransactionLog::new();
        let addr = Address::normalize("0xaaa");
        log.append(&addr, tx("0x1"));
        log.append(&addr, tx("0x2"));
        log.append(&addr, tx("0x3"));

        let recorded = log.get(&addr);
        let hashes: Vec<_> = recorded.iter().filter_map(|t| t.hash.as_deref()).collect();
        assert_eq!(hashes, vec!["0x1", "0x2", "0x3"]);
    }

    #[test]
    fn duplicate_appends_are_kept() {
        let log = TransactionLog::new();
        let addr = Address::normalize("0xaaa");
        log.append(&addr, tx("0x1"));
        log.append(&addr, tx("0x1"));
        assert_eq!(log.get(&addr).len(), 2);
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let log = TransactionLog::new();
        let addr = Address::normalize("0xaaa");
        log.append(&addr, tx("0x1"));

        let snapshot = log.get(&addr);
        log.append(&addr, tx("0x2"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.get(&addr).len(), 2);
    }

    #[test]
    fn addresses_are_tracked_independently() {
        let log = TransactionLog::new();
        log.append(&Address::normalize("0xaaa"), tx("0x1"));
        log.append(&Address::normalize("0xbbb"), tx("0x2"));

        assert_eq!(log.address_count(), 2);
        assert_eq!(log.get(&Address::normalize("0xaaa")).len(), 1);
        assert_eq!(log.get(&Address::normalize("0xbbb")).len(), 1);
    }
}
