//! `<topic> subscribe` and `<topic> unsubscribe` handlers

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{decode, CommandHandler};
use crate::error::GatewayError;
use crate::session::ClientSession;
use crate::store::Store;
use crate::subscription::{self, Category, CategoryKind};

/// Parameters of `message subscribe`
#[derive(Debug, Deserialize)]
struct MessageTopic {
    #[serde(rename = "channelId")]
    channel_id: String,
}

/// Starts (or replaces) the subscription for one category kind
pub struct SubscribeHandler {
    kind: CategoryKind,
    store: Arc<dyn Store>,
}

impl SubscribeHandler {
    pub fn new(kind: CategoryKind, store: Arc<dyn Store>) -> Self {
        Self { kind, store }
    }

    /// Build the category from the command payload
    fn category(&self, payload: Value) -> Result<Category, GatewayError> {
        match self.kind {
            CategoryKind::Channel => Ok(Category::Channel),
            CategoryKind::User => Ok(Category::User),
            CategoryKind::Message => {
                let topic: MessageTopic = decode(payload)?;
                Ok(Category::Message {
                    channel_id: topic.channel_id,
                })
            }
        }
    }
}

#[async_trait]
impl CommandHandler for SubscribeHandler {
    fn name(&self) -> String {
        format!("{} subscribe", self.kind.topic())
    }

    async fn handle(&self, session: &Arc<ClientSession>, payload: Value) {
        let category = match self.category(payload) {
            Ok(category) => category,
            Err(e) => {
                session.send_error(e);
                return;
            }
        };

        // Tasks run detached; the registry token is what stops them
        let _ = subscription::subscribe(self.store.as_ref(), session, category).await;
    }
}

/// Stops the subscription for one category kind, if any
pub struct UnsubscribeHandler {
    kind: CategoryKind,
}

impl UnsubscribeHandler {
    pub fn new(kind: CategoryKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl CommandHandler for UnsubscribeHandler {
    fn name(&self) -> String {
        format!("{} unsubscribe", self.kind.topic())
    }

    async fn handle(&self, session: &Arc<ClientSession>, _payload: Value) {
        subscription::unsubscribe(session, self.kind);
    }
}
