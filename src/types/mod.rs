//! Record types for the rtsupport gateway
//!
//! This module contains the documents stored by the backing store and the
//! before/after change pairs its change feed yields.

mod change;
mod channel;
mod message;
mod user;

pub use change::ChangeRecord;
pub use channel::Channel;
pub use message::{Message, NewMessage};
pub use user::User;

/// Display name given to a freshly connected client
pub const ANONYMOUS_USER: &str = "anonymous";

/// Check that a required text field is non-empty after trimming
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be empty", field))
    } else {
        Ok(())
    }
}
