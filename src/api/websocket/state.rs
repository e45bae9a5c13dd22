//! WebSocket application state

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::handlers::{register_all_handlers, CommandRouter};
use crate::session::SessionManager;
use crate::store::Store;

/// Shared application state for WebSocket connections
pub struct AppState {
    /// The backing store
    pub store: Arc<dyn Store>,

    /// Connected clients
    pub sessions: SessionManager,

    /// Command handlers keyed by command type
    pub router: CommandRouter,

    pub config: GatewayConfig,
}

impl AppState {
    /// Create state with every command handler registered against `store`
    pub fn new(store: Arc<dyn Store>, config: GatewayConfig) -> Self {
        let mut router = CommandRouter::new();
        register_all_handlers(&mut router, store.clone());

        Self {
            sessions: SessionManager::new(store.clone()),
            store,
            router,
            config,
        }
    }

    /// Get the number of connected clients
    pub fn session_count(&self) -> usize {
        self.sessions.session_count()
    }
}
