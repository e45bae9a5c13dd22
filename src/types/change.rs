//! Change records yielded by a change feed

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One mutation as a before/after document pair
///
/// `old` absent means an insert (or an initial document replayed by the
/// feed), `new` absent means a delete, both present means an update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(rename = "old_val", default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    #[serde(rename = "new_val", default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
}

impl ChangeRecord {
    pub fn inserted(new: Value) -> Self {
        Self {
            old: None,
            new: Some(new),
        }
    }

    pub fn updated(old: Value, new: Value) -> Self {
        Self {
            old: Some(old),
            new: Some(new),
        }
    }

    pub fn deleted(old: Value) -> Self {
        Self {
            old: Some(old),
            new: None,
        }
    }

    /// The document this change is about, preferring the new version
    pub fn document(&self) -> Option<&Value> {
        self.new.as_ref().or(self.old.as_ref())
    }
}
