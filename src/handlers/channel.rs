//! `channel add` handler

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{decode, persist, CommandHandler};
use crate::error::GatewayError;
use crate::session::ClientSession;
use crate::store::{Store, Table};
use crate::types::Channel;

/// Creates a channel; success is observed through the channel feed
pub struct AddChannelHandler {
    store: Arc<dyn Store>,
}

impl AddChannelHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for AddChannelHandler {
    fn name(&self) -> String {
        "channel add".to_string()
    }

    async fn handle(&self, session: &Arc<ClientSession>, payload: Value) {
        let channel: Channel = match decode(payload) {
            Ok(channel) => channel,
            Err(e) => {
                session.send_error(e);
                return;
            }
        };
        if let Err(e) = channel.validate() {
            session.send_error(GatewayError::Decode(e));
            return;
        }

        let document = match serde_json::to_value(&channel) {
            Ok(document) => document,
            Err(e) => {
                session.send_error(GatewayError::decode(e));
                return;
            }
        };

        let store = self.store.clone();
        persist(session, async move {
            store.insert(Table::Channel, document).await.map(|_| ())
        });
    }
}
