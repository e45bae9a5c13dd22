//! WebSocket module for real-time notifications
//!
//! Provides the WebSocket endpoint at `/ws`. Each connection gets a client
//! session; text frames carry `{type, payload}` command envelopes and the
//! session's outbound queue is written back as the same envelope shape.

pub mod handler;
pub mod state;

pub use handler::ws_handler;
pub use state::AppState;
