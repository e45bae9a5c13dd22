//! Wire protocol for the rtsupport gateway
//!
//! Both directions use the same `{type, payload}` envelope shape.

mod envelope;

pub use envelope::{Command, OutboundMessage};
