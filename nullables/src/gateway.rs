//! Nullable gateway — a scripted chain node.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use chainwatch_gateway::{GatewayError, LedgerGateway};
use chainwatch_types::{BlockHeight, Transaction};

/// Build a minimal transfer transaction for test blocks.
pub fn transfer(hash: &str, from: &str, to: &str) -> Transaction {
    Transaction {
        hash: Some(hash.to_string()),
        from: Some(from.to_string()),
        to: Some(to.to_string()),
        value: Some("0x0".to_string()),
        block_number: None,
    }
}

/// A test gateway that answers from a script instead of a node.
///
/// Height answers are consumed in order; the last one repeats forever so a
/// single `push_height` covers any number of polls. Blocks are looked up in
/// a map (unset heights answer with an empty list, like an empty block),
/// and individual heights can be made to fail on demand.
///
/// State sits behind `Mutex`es rather than `RefCell`s because the engine
/// calls the gateway from a spawned task.
pub struct NullGateway {
    heights: Mutex<VecDeque<Result<BlockHeight, String>>>,
    blocks: Mutex<HashMap<BlockHeight, Vec<Transaction>>>,
    failing_blocks: Mutex<HashSet<BlockHeight>>,
    /// Number of `current_height` calls served (for assertions).
    height_calls: AtomicUsize,
}

impl NullGateway {
    pub fn new() -> Self {
        Self {
            heights: Mutex::new(VecDeque::new()),
            blocks: Mutex::new(HashMap::new()),
            failing_blocks: Mutex::new(HashSet::new()),
            height_calls: AtomicUsize::new(0),
        }
    }

    /// Script the next `current_height` answer.
    pub fn push_height(&self, height: BlockHeight) {
        self.heights
            .lock()
            .expect("height script lock")
            .push_back(Ok(height));
    }

    /// Script the next `current_height` call to fail.
    pub fn push_height_error(&self, message: &str) {
        self.heights
            .lock()
            .expect("height script lock")
            .push_back(Err(message.to_string()));
    }

    /// Set the transaction list for a block.
    pub fn set_block(&self, height: BlockHeight, transactions: Vec<Transaction>) {
        self.blocks
            .lock()
            .expect("block map lock")
            .insert(height, transactions);
    }

    /// Make `block_transactions(height)` fail until cleared.
    pub fn fail_block(&self, height: BlockHeight) {
        self.failing_blocks
            .lock()
            .expect("failing set lock")
            .insert(height);
    }

    /// Let a previously failing block succeed again.
    pub fn heal_block(&self, height: BlockHeight) {
        self.failing_blocks
            .lock()
            .expect("failing set lock")
            .remove(&height);
    }

    /// Number of `current_height` calls served so far.
    pub fn height_calls(&self) -> usize {
        self.height_calls.load(Ordering::Relaxed)
    }
}

impl Default for NullGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerGateway for NullGateway {
    async fn current_height(&self) -> Result<BlockHeight, GatewayError> {
        self.height_calls.fetch_add(1, Ordering::Relaxed);
        let mut script = self.heights.lock().expect("height script lock");
        let answer = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        match answer {
            Some(Ok(height)) => Ok(height),
            Some(Err(message)) => Err(GatewayError::Transport(message)),
            None => Err(GatewayError::Transport("no height scripted".to_string())),
        }
    }

    async fn block_transactions(
        &self,
        height: BlockHeight,
    ) -> Result<Vec<Transaction>, GatewayError> {
        if self
            .failing_blocks
            .lock()
            .expect("failing set lock")
            .contains(&height)
        {
            return Err(GatewayError::Transport(format!(
                "scripted failure for block {height}"
            )));
        }
        Ok(self
            .blocks
            .lock()
            .expect("block map lock")
            .get(&height)
            .cloned()
            .unwrap_or_default())
    }
}
