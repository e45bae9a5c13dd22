//! Session manager for tracking connected clients

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::json;

use super::{ClientSession, OutboundSink};
use crate::error::{GatewayError, Result};
use crate::store::{Store, Table};
use crate::types::ANONYMOUS_USER;

/// Tracks every connected client and the User record backing it
pub struct SessionManager {
    store: Arc<dyn Store>,
    sessions: DashMap<String, Arc<ClientSession>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            sessions: DashMap::new(),
        }
    }

    /// Create the User record for a new connection and register its session
    pub async fn connect(&self, outbound: OutboundSink) -> Result<Arc<ClientSession>> {
        let id = self
            .store
            .insert(Table::User, json!({ "name": ANONYMOUS_USER }))
            .await
            .map_err(GatewayError::Persistence)?;

        let session = Arc::new(ClientSession::new(id.clone(), ANONYMOUS_USER, outbound));
        self.sessions.insert(id.clone(), session.clone());
        tracing::info!(client = %id, "client connected");

        Ok(session)
    }

    /// Tear down a session: cancel its subscriptions and delete its User record
    pub async fn disconnect(&self, session: &ClientSession) {
        session.teardown_all();
        self.sessions.remove(session.id());

        if let Err(e) = self.store.delete(Table::User, session.id()).await {
            tracing::warn!(client = %session.id(), error = %e, "failed to delete user record");
        }
        tracing::info!(client = %session.id(), "client disconnected");
    }

    pub fn get_session(&self, id: &str) -> Option<Arc<ClientSession>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Get active session count
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(store.clone());
        let (sink, _rx) = OutboundSink::channel(4);

        let session = manager.connect(sink).await.unwrap();
        assert_eq!(session.name(), ANONYMOUS_USER);
        assert_eq!(manager.session_count(), 1);

        let record = store.get(Table::User, session.id()).await.unwrap().unwrap();
        assert_eq!(record["name"], ANONYMOUS_USER);

        manager.disconnect(&session).await;
        assert_eq!(manager.session_count(), 0);
        assert!(manager.get_session(session.id()).is_none());
        assert!(store.get(Table::User, session.id()).await.unwrap().is_none());
    }
}
