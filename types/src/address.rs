//! Watched-address type, canonicalized to lowercase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An address as tracked by the watcher, folded to lowercase.
///
/// Subscription and matching are case-insensitive. `normalize` is the only
/// constructor, so every `Address` held by the subscription registry or the
/// transaction log is already canonical. No format validation happens here;
/// the chain node is the authority on what an address is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Canonicalize a raw address string. Case folding only.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    /// Return the canonical address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
