//! Command handlers
//!
//! This module contains one handler per inbound command type:
//! - Record operations (3): `channel add`, `user edit`, `message add`
//! - Subscription commands (6): `subscribe` / `unsubscribe` for each of
//!   `channel`, `user` and `message`

mod channel;
mod message;
mod subscribe;
mod user;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{GatewayError, Result};
use crate::protocol::Command;
use crate::session::ClientSession;
use crate::store::Store;
use crate::subscription::CategoryKind;

pub use channel::AddChannelHandler;
pub use message::AddMessageHandler;
pub use subscribe::{SubscribeHandler, UnsubscribeHandler};
pub use user::EditUserHandler;

/// Handler for one command type
///
/// Handlers report failures to the client through its outbound sink; they
/// never fail the connection.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command type this handler serves, e.g. `"channel add"`
    fn name(&self) -> String;

    async fn handle(&self, session: &Arc<ClientSession>, payload: Value);
}

/// Routes commands to handlers by type
#[derive(Default)]
pub struct CommandRouter {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its name, replacing any previous one
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> &mut Self {
        self.handlers.insert(handler.name(), handler);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn handles(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Run the handler for `command`; unknown types get an error reply
    pub async fn dispatch(&self, session: &Arc<ClientSession>, command: Command) {
        match self.handlers.get(&command.kind) {
            Some(handler) => {
                tracing::trace!(client = %session.id(), command = %command.kind, "dispatching");
                handler.handle(session, command.payload).await;
            }
            None => {
                tracing::debug!(client = %session.id(), command = %command.kind, "unknown command");
                session.send_error(GatewayError::UnknownCommand(command.kind));
            }
        }
    }
}

/// Register all nine command handlers
pub fn register_all_handlers(router: &mut CommandRouter, store: Arc<dyn Store>) {
    // Record operations (3)
    router.register(Arc::new(AddChannelHandler::new(store.clone())));
    router.register(Arc::new(EditUserHandler::new(store.clone())));
    router.register(Arc::new(AddMessageHandler::new(store.clone())));

    // Subscriptions (6)
    for kind in [CategoryKind::Channel, CategoryKind::User, CategoryKind::Message] {
        router.register(Arc::new(SubscribeHandler::new(kind, store.clone())));
        router.register(Arc::new(UnsubscribeHandler::new(kind)));
    }
}

/// Decode a command payload into `T`
pub(crate) fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(GatewayError::decode)
}

/// Run a write in the background, reporting a failure to the client
pub(crate) fn persist<F>(session: &Arc<ClientSession>, write: F)
where
    F: std::future::Future<Output = crate::store::StoreResult<()>> + Send + 'static,
{
    let session = session.clone();
    tokio::spawn(async move {
        if let Err(e) = write.await {
            let err = GatewayError::Persistence(e);
            tracing::warn!(client = %session.id(), error = %err, "write failed");
            session.send_error(err);
        }
    });
}
