//! Channel message records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;

/// A message posted to a channel
///
/// `author` and `created_at` are always stamped by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: String,
    pub body: String,
    pub author: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Client-supplied part of a message; any other fields are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    #[serde(rename = "channelId")]
    pub channel_id: String,
    pub body: String,
}

impl NewMessage {
    pub fn validate(&self) -> Result<(), String> {
        require_text("channelId", &self.channel_id)
    }

    /// Attribute the message to `author` at `created_at`
    pub fn stamp(self, author: String, created_at: DateTime<Utc>) -> Message {
        Message {
            id: None,
            channel_id: self.channel_id,
            body: self.body,
            author,
            created_at,
        }
    }
}
