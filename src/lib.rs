//! rtsupport gateway
//!
//! A real-time notification gateway: clients hold a WebSocket connection,
//! create channels, rename themselves, post messages, and subscribe to live
//! change streams of channels, users and the messages of one channel.
//!
//! # Features
//!
//! - **Subscription multiplexer**: at most one live subscription per topic
//!   kind per client; resubscribing replaces the previous one
//! - **Change classification**: raw before/after pairs become `add`, `edit`
//!   and `remove` events per topic
//! - **Non-blocking delivery**: bounded per-client queues that drop rather
//!   than stall when a client falls behind
//! - **Fire-and-forget writes**: failures come back as `error` messages
//!
//! # Modules
//!
//! - `types`: Records (Channel, User, Message) and change records
//! - `protocol`: Command and outbound message envelopes
//! - `store`: Backing store and change feed traits, in-memory store
//! - `session`: Client sessions, outbound queues, subscription registry
//! - `subscription`: Subscribe/unsubscribe, classification, forwarding tasks
//! - `handlers`: Command handlers and router
//! - `api`: Axum HTTP/WebSocket endpoints
//! - `config`: Command line configuration
//! - `utils`: Cancellation token
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rtsupport::{create_router, AppState, GatewayConfig, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GatewayConfig::default();
//!     let store = Arc::new(MemoryStore::with_feed_capacity(config.feed_capacity));
//!     let state = Arc::new(AppState::new(store, config.clone()));
//!     let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
//!     axum::serve(listener, create_router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod session;
pub mod store;
pub mod subscription;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use api::http::create_router;
pub use api::websocket::AppState;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use handlers::{register_all_handlers, CommandHandler, CommandRouter};
pub use protocol::{Command, OutboundMessage};
pub use session::{ClientSession, OutboundSink, SessionManager};
pub use store::{ChangeFeed, FeedQuery, MemoryStore, Store, StoreError, Table};
pub use subscription::{Category, CategoryKind, ChangeEvent, SubscriptionHandle};
pub use types::{Channel, ChangeRecord, Message, User};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
