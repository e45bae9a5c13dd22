//! Error types for the gateway
//!
//! Every error a client can see is rendered through its `Display` text into a
//! single `error` envelope; there are no structured error codes on the wire.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// An inbound payload could not be decoded into the expected record
    #[error("invalid payload: {0}")]
    Decode(String),

    /// A fire-and-forget write failed
    #[error("persistence failed: {0}")]
    Persistence(#[source] StoreError),

    /// A change feed could not be opened
    #[error("cannot open change feed: {0}")]
    StreamOpen(#[source] StoreError),

    /// A change feed broke while being drained
    #[error("change feed read failed: {0}")]
    StreamRead(#[source] StoreError),

    #[error("unknown command type: {0}")]
    UnknownCommand(String),

    /// An inbound frame was not a command envelope
    #[error("malformed frame: {0}")]
    Frame(String),
}

impl GatewayError {
    /// Decode error carrying serde's description of what went wrong
    pub fn decode(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message_is_not_empty() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let msg = GatewayError::decode(err).to_string();
        assert!(msg.starts_with("invalid payload: "));
        assert!(msg.len() > "invalid payload: ".len());
    }

    #[test]
    fn test_store_error_is_wrapped() {
        let err = GatewayError::Persistence(StoreError::NotFound {
            table: "user".to_string(),
            id: "u1".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "persistence failed: no document with id u1 in table user"
        );
    }
}
