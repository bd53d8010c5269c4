//! Gateway error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0} from node")]
    Status(u16),

    #[error("node returned JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("failed to decode node response: {0}")]
    Decode(String),

    #[error("invalid hex quantity: {0:?}")]
    InvalidQuantity(String),
}
