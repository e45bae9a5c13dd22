//! `message add` handler

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::{decode, persist, CommandHandler};
use crate::error::GatewayError;
use crate::session::ClientSession;
use crate::store::{Store, Table};
use crate::types::NewMessage;

/// Posts a message, stamped with the sender's current name and the server time
pub struct AddMessageHandler {
    store: Arc<dyn Store>,
}

impl AddMessageHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for AddMessageHandler {
    fn name(&self) -> String {
        "message add".to_string()
    }

    async fn handle(&self, session: &Arc<ClientSession>, payload: Value) {
        let new: NewMessage = match decode(payload) {
            Ok(new) => new,
            Err(e) => {
                session.send_error(e);
                return;
            }
        };
        if let Err(e) = new.validate() {
            session.send_error(GatewayError::Decode(e));
            return;
        }

        let message = new.stamp(session.name(), Utc::now());
        let document = match serde_json::to_value(&message) {
            Ok(document) => document,
            Err(e) => {
                session.send_error(GatewayError::decode(e));
                return;
            }
        };

        let store = self.store.clone();
        persist(session, async move {
            store.insert(Table::Message, document).await.map(|_| ())
        });
    }
}
