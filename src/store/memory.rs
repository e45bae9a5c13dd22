//! In-memory document store with change feeds
//!
//! Documents live in per-table ordered maps. Every write publishes its
//! before/after pair on the table's broadcast channel while the write lock
//! is held, so a feed that snapshots the table under the read lock and
//! subscribes in the same critical section sees neither gaps nor duplicates.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};

use super::{ChangeFeed, FeedQuery, Store, StoreError, StoreResult, Table};
use crate::types::ChangeRecord;
use crate::utils::CancelToken;

/// Default number of changes a slow feed may fall behind before it lags
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

pub struct MemoryStore {
    tables: RwLock<HashMap<Table, BTreeMap<String, Value>>>,
    feeds: HashMap<Table, broadcast::Sender<ChangeRecord>>,
    open_feeds: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_feed_capacity(DEFAULT_FEED_CAPACITY)
    }

    pub fn with_feed_capacity(capacity: usize) -> Self {
        let feeds = Table::ALL
            .iter()
            .map(|table| (*table, broadcast::channel(capacity.max(1)).0))
            .collect();
        let tables = Table::ALL
            .iter()
            .map(|table| (*table, BTreeMap::new()))
            .collect();

        Self {
            tables: RwLock::new(tables),
            feeds,
            open_feeds: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Snapshot of every document in a table, ordered by id
    pub fn documents(&self, table: Table) -> Vec<Value> {
        self.tables
            .read()
            .get(&table)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of feeds opened and not yet closed
    pub fn open_feeds(&self) -> usize {
        self.open_feeds.load(Ordering::SeqCst)
    }

    /// Publish a change to the table's feeds. Callers hold the write lock.
    fn publish(&self, table: Table, change: ChangeRecord) {
        if let Some(feed) = self.feeds.get(&table) {
            // Ignore send errors - they just mean no feed is open
            let _ = feed.send(change);
        }
    }

    fn not_found(table: Table, id: &str) -> StoreError {
        StoreError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, table: Table, document: Value) -> StoreResult<String> {
        let Value::Object(mut fields) = document else {
            return Err(StoreError::InvalidDocument(format!(
                "{} documents must be objects",
                table
            )));
        };

        let id = match fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Null) | None => uuid::Uuid::new_v4().to_string(),
            Some(Value::String(_)) => uuid::Uuid::new_v4().to_string(),
            Some(other) => {
                return Err(StoreError::InvalidDocument(format!(
                    "id must be a string, got {}",
                    other
                )))
            }
        };
        fields.insert("id".to_string(), Value::String(id.clone()));
        let document = Value::Object(fields);

        let mut tables = self.tables.write();
        let docs = tables.entry(table).or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::Conflict {
                table: table.to_string(),
                id,
            });
        }
        docs.insert(id.clone(), document.clone());
        self.publish(table, ChangeRecord::inserted(document));

        Ok(id)
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<()> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::InvalidDocument(
                "update patch must be an object".to_string(),
            ));
        };

        let mut tables = self.tables.write();
        let document = tables
            .get_mut(&table)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| Self::not_found(table, id))?;

        let old = document.clone();
        if let Value::Object(fields) = document {
            for (key, value) in patch {
                if key != "id" {
                    fields.insert(key, value);
                }
            }
        }

        // Unchanged documents produce no change record
        if *document != old {
            let new = document.clone();
            self.publish(table, ChangeRecord::updated(old, new));
        }
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let old = tables
            .get_mut(&table)
            .and_then(|docs| docs.remove(id))
            .ok_or_else(|| Self::not_found(table, id))?;

        self.publish(table, ChangeRecord::deleted(old));
        Ok(())
    }

    async fn get(&self, table: Table, id: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .tables
            .read()
            .get(&table)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn changes(&self, query: FeedQuery) -> StoreResult<Arc<dyn ChangeFeed>> {
        let feed = self
            .feeds
            .get(&query.table)
            .ok_or_else(|| StoreError::Unavailable(format!("no feed for {}", query.table)))?;

        let (live, initial) = {
            let tables = self.tables.read();
            let live = feed.subscribe();

            let mut initial: Vec<Value> = if query.include_initial {
                tables
                    .get(&query.table)
                    .map(|docs| {
                        docs.values()
                            .filter(|doc| query.matches(doc))
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default()
            } else {
                Vec::new()
            };
            query.sort(&mut initial);
            (live, initial)
        };

        self.open_feeds.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(
            table = %query.table,
            initial = initial.len(),
            "change feed opened"
        );

        Ok(Arc::new(MemoryFeed {
            initial: Mutex::new(initial.into_iter().map(ChangeRecord::inserted).collect()),
            live: tokio::sync::Mutex::new(live),
            query,
            closed: CancelToken::new(),
            released: AtomicBool::new(false),
            open_feeds: self.open_feeds.clone(),
        }))
    }
}

/// Change feed over one [`MemoryStore`] table
pub struct MemoryFeed {
    query: FeedQuery,
    initial: Mutex<VecDeque<ChangeRecord>>,
    live: tokio::sync::Mutex<broadcast::Receiver<ChangeRecord>>,
    closed: CancelToken,
    released: AtomicBool,
    open_feeds: Arc<AtomicUsize>,
}

impl MemoryFeed {
    fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.open_feeds.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl ChangeFeed for MemoryFeed {
    async fn next(&self) -> Option<StoreResult<ChangeRecord>> {
        if self.closed.is_cancelled() {
            return None;
        }

        let replayed = self.initial.lock().pop_front();
        if let Some(change) = replayed {
            return Some(Ok(change));
        }

        let mut live = self.live.lock().await;
        loop {
            tokio::select! {
                biased;
                _ = self.closed.cancelled() => return None,
                received = live.recv() => match received {
                    Ok(change) => {
                        if let Some(change) = self.query.project(&change) {
                            return Some(Ok(change));
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        return Some(Err(StoreError::FeedLagged(skipped)));
                    }
                    Err(RecvError::Closed) => return None,
                },
            }
        }
    }

    fn close(&self) {
        self.closed.cancel();
        self.release();
    }
}

impl Drop for MemoryFeed {
    fn drop(&mut self) {
        self.release();
    }
}
