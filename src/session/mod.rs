//! Client sessions
//!
//! A session is the server-side state of one connection: the id of its User
//! record, the display name used to attribute messages, the outbound sink
//! and the registry of live subscriptions.

mod manager;
mod outbound;
mod registry;

use parking_lot::RwLock;

use crate::protocol::OutboundMessage;
use crate::subscription::CategoryKind;
use crate::utils::CancelToken;

pub use manager::SessionManager;
pub use outbound::{OutboundSink, DEFAULT_OUTBOUND_CAPACITY};
pub use registry::SubscriptionRegistry;

/// State of one connected client
#[derive(Debug)]
pub struct ClientSession {
    id: String,
    name: RwLock<String>,
    outbound: OutboundSink,
    subscriptions: SubscriptionRegistry,
}

impl ClientSession {
    pub fn new(id: impl Into<String>, name: impl Into<String>, outbound: OutboundSink) -> Self {
        Self {
            id: id.into(),
            name: RwLock::new(name.into()),
            outbound,
            subscriptions: SubscriptionRegistry::new(),
        }
    }

    /// Id of this client's User record
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current display name
    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write() = name.into();
    }

    pub fn outbound(&self) -> &OutboundSink {
        &self.outbound
    }

    pub fn send(&self, message: OutboundMessage) -> bool {
        self.outbound.send(message)
    }

    pub fn send_error(&self, message: impl ToString) -> bool {
        self.outbound.error(message)
    }

    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    pub fn register_and_supersede(&self, kind: CategoryKind) -> CancelToken {
        self.subscriptions.register_and_supersede(kind)
    }

    pub fn cancel(&self, kind: CategoryKind) -> bool {
        self.subscriptions.cancel(kind)
    }

    /// Cancel every subscription of this client
    pub fn teardown_all(&self) -> usize {
        let cancelled = self.subscriptions.teardown_all();
        tracing::debug!(client = %self.id, cancelled, "client subscriptions torn down");
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_updates_are_visible_immediately() {
        let (sink, _rx) = OutboundSink::channel(4);
        let session = ClientSession::new("u1", "anonymous", sink);
        assert_eq!(session.name(), "anonymous");

        session.set_name("Ana");
        assert_eq!(session.name(), "Ana");
        assert_eq!(session.id(), "u1");
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let (sink, _rx) = OutboundSink::channel(4);
        let session = ClientSession::new("u1", "anonymous", sink);
        let channel = session.register_and_supersede(CategoryKind::Channel);
        let user = session.register_and_supersede(CategoryKind::User);

        assert_eq!(session.teardown_all(), 2);
        assert!(channel.is_cancelled());
        assert!(user.is_cancelled());
        assert!(!session.cancel(CategoryKind::User));
    }
}
