//! User records

use serde::{Deserialize, Serialize};

use super::require_text;

/// A connected (or once connected) user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl User {
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
