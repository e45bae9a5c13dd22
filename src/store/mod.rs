//! Backing store and change feed interfaces
//!
//! The gateway only talks to the store through [`Store`] and [`ChangeFeed`],
//! so any document database with a change feed can sit behind it. An
//! in-memory implementation ([`MemoryStore`]) is provided for running the
//! server standalone and for tests.

mod memory;
mod query;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::ChangeRecord;

pub use memory::{MemoryFeed, MemoryStore, DEFAULT_FEED_CAPACITY};
pub use query::{FeedQuery, Table};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no document with id {id} in table {table}")]
    NotFound { table: String, id: String },

    #[error("duplicate primary key {id} in table {table}")]
    Conflict { table: String, id: String },

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The feed fell behind and skipped changes
    #[error("change feed lagged, {0} changes skipped")]
    FeedLagged(u64),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store with change feeds
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a document, assigning an id if it has none; returns the id
    async fn insert(&self, table: Table, document: Value) -> StoreResult<String>;

    /// Merge the fields of `patch` into the document with the given id
    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<()>;

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()>;

    async fn get(&self, table: Table, id: &str) -> StoreResult<Option<Value>>;

    /// Open a change feed for `query`
    async fn changes(&self, query: FeedQuery) -> StoreResult<Arc<dyn ChangeFeed>>;
}

/// Pull-based stream of change records
///
/// The handle is shared: one task pulls with [`ChangeFeed::next`] while
/// another may call [`ChangeFeed::close`] to end it.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Wait for the next change; `None` once the feed is exhausted or closed
    async fn next(&self) -> Option<StoreResult<ChangeRecord>>;

    /// Close the feed, releasing it and resolving any pending `next` with `None`.
    /// Idempotent.
    fn close(&self);
}
