//! `user edit` handler

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{decode, persist, CommandHandler};
use crate::error::GatewayError;
use crate::session::ClientSession;
use crate::store::{Store, Table};
use crate::types::User;

/// Renames the client's own User record
///
/// The cached name changes before the write completes, so messages sent
/// right after an edit already carry the new name.
pub struct EditUserHandler {
    store: Arc<dyn Store>,
}

impl EditUserHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for EditUserHandler {
    fn name(&self) -> String {
        "user edit".to_string()
    }

    async fn handle(&self, session: &Arc<ClientSession>, payload: Value) {
        let user: User = match decode(payload) {
            Ok(user) => user,
            Err(e) => {
                session.send_error(e);
                return;
            }
        };
        if let Err(e) = user.validate() {
            session.send_error(GatewayError::Decode(e));
            return;
        }

        session.set_name(user.name.clone());

        let store = self.store.clone();
        let id = session.id().to_string();
        persist(session, async move {
            store
                .update(Table::User, &id, json!({ "name": user.name }))
                .await
        });
    }
}
