//! Channel records

use serde::{Deserialize, Serialize};

use super::require_text;

/// A chat channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl Channel {
    /// Create a channel whose id is assigned by the store on insert
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_without_id_omits_it() {
        let value = serde_json::to_value(Channel::new("general")).unwrap();
        assert_eq!(value, json!({"name": "general"}));
    }

    #[test]
    fn test_channel_requires_name() {
        assert!(serde_json::from_value::<Channel>(json!({"id": "c1"})).is_err());
        assert!(Channel::new("  ").validate().is_err());
    }
}
