//! Transaction record as reported by the chain node.

use serde::{Deserialize, Serialize};

/// A transaction observed inside one block.
///
/// Every field is independently optional: the node may report a
/// contract-creation transaction (no receiver) or otherwise incomplete
/// data, and the watcher must tolerate any field being absent. Numeric
/// fields stay opaque hex strings exactly as the node encodes them.
/// Immutable once stored in the transaction log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    /// Transaction hash.
    pub hash: Option<String>,
    /// Sender address, as reported (not normalized).
    pub from: Option<String>,
    /// Receiver address; absent for contract creation.
    pub to: Option<String>,
    /// Transferred value, hex quantity.
    pub value: Option<String>,
    /// Height of the containing block, hex quantity.
    pub block_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_node_fields() {
        let json = r#"{
            "hash": "0xabc",
            "from": "0x111",
            "to": "0x222",
            "value": "0x38d7ea4c68000",
            "blockNumber": "0x10"
        }"#;
        let tx: Transaction = serde_json::from_str(json).expect("valid transaction");
        assert_eq!(tx.hash.as_deref(), Some("0xabc"));
        assert_eq!(tx.from.as_deref(), Some("0x111"));
        assert_eq!(tx.to.as_deref(), Some("0x222"));
        assert_eq!(tx.block_number.as_deref(), Some("0x10"));
    }

    #[test]
    fn absent_and_null_fields_become_none() {
        // Contract creation: "to" is null; other fields missing entirely.
        let json = r#"{"hash": "0xabc", "to": null}"#;
        let tx: Transaction = serde_json::from_str(json).expect("partial transaction");
        assert!(tx.to.is_none());
        assert!(tx.from.is_none());
        assert!(tx.value.is_none());
    }

    #[test]
    fn unknown_node_fields_are_ignored() {
        let json = r#"{"hash": "0xabc", "gas": "0x5208", "nonce": "0x1"}"#;
        let tx: Transaction = serde_json::from_str(json).expect("extra fields tolerated");
        assert_eq!(tx.hash.as_deref(), Some("0xabc"));
    }

    #[test]
    fn serializes_with_wire_names() {
        let tx = Transaction {
            hash: Some("0xabc".into()),
            block_number: Some("0x10".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&tx).expect("serializable");
        assert_eq!(json["blockNumber"], "0x10");
        assert!(json["from"].is_null());
    }
}
