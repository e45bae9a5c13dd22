//! Inbound command and outbound message envelopes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command sent by a client, e.g. `{"type": "channel add", "payload": {"name": "general"}}`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Command {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Command {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// Message delivered to a client through its outbound sink
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum OutboundMessage {
    #[serde(rename = "error")]
    Error(String),

    #[serde(rename = "channel add")]
    ChannelAdded(Value),

    #[serde(rename = "user add")]
    UserAdded(Value),

    #[serde(rename = "user edit")]
    UserEdited(Value),

    #[serde(rename = "user remove")]
    UserRemoved(Value),

    #[serde(rename = "message add")]
    MessageAdded(Value),
}

impl OutboundMessage {
    /// Wire name of this message
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::Error(_) => "error",
            OutboundMessage::ChannelAdded(_) => "channel add",
            OutboundMessage::UserAdded(_) => "user add",
            OutboundMessage::UserEdited(_) => "user edit",
            OutboundMessage::UserRemoved(_) => "user remove",
            OutboundMessage::MessageAdded(_) => "message add",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OutboundMessage::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_parsing() {
        let json = r#"{"type":"message subscribe","payload":{"channelId":"c1"}}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.kind, "message subscribe");
        assert_eq!(cmd.payload, json!({"channelId": "c1"}));
    }

    #[test]
    fn test_command_payload_defaults_to_null() {
        let cmd: Command = serde_json::from_str(r#"{"type":"channel subscribe"}"#).unwrap();
        assert_eq!(cmd.payload, Value::Null);
    }

    #[test]
    fn test_outbound_envelope_shape() {
        let msg = OutboundMessage::UserEdited(json!({"id": "u1", "name": "Ana"}));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({"type": "user edit", "payload": {"id": "u1", "name": "Ana"}})
        );

        let err = serde_json::to_value(OutboundMessage::Error("boom".to_string())).unwrap();
        assert_eq!(err, json!({"type": "error", "payload": "boom"}));
    }

    #[test]
    fn test_kind_matches_serialized_type() {
        let msg = OutboundMessage::MessageAdded(json!({}));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], msg.kind());
    }
}
