//! Block height on the remote chain.

/// Height of a block, as reported by the chain node.
///
/// The watcher's cursor is a value of this type: the height of the highest
/// block fully ingested so far.
pub type BlockHeight = u64;
