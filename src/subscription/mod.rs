//! Subscription controller
//!
//! Subscribing opens a change feed for a category and starts two tasks that
//! forward its classified events to the client. A client has at most one
//! live subscription per category kind; subscribing again replaces it.
//!
//! ## Lifecycle
//! - `subscribe` registers a fresh token (cancelling any predecessor),
//!   opens the feed and spawns the drain and dispatch tasks
//! - `unsubscribe` cancels the token; the dispatch task closes the feed and
//!   the drain task ends once its pending pull returns
//! - a feed that ends on its own releases its registry entry

mod category;
pub mod classify;
mod pump;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::GatewayError;
use crate::session::ClientSession;
use crate::store::Store;
use crate::utils::CancelToken;

pub use category::{Category, CategoryKind};
pub use classify::{classifier, classify, ChangeEvent};

/// Handle to the tasks of one live subscription
#[derive(Debug)]
pub struct SubscriptionHandle {
    kind: CategoryKind,
    token: CancelToken,
    drain: JoinHandle<()>,
    dispatch: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_finished(&self) -> bool {
        self.drain.is_finished() && self.dispatch.is_finished()
    }

    /// Wait until both tasks have exited
    pub async fn join(self) {
        let _ = self.dispatch.await;
        let _ = self.drain.await;
    }
}

/// Start streaming `category` to `session`, replacing any subscription of
/// the same kind
///
/// Returns `None` if the feed could not be opened; the client has then
/// been sent an error.
pub async fn subscribe(
    store: &dyn Store,
    session: &Arc<ClientSession>,
    category: Category,
) -> Option<SubscriptionHandle> {
    let kind = category.kind();
    let token = session.register_and_supersede(kind);

    let feed = match store.changes(category.query()).await {
        Ok(feed) => feed,
        Err(e) => {
            session.subscriptions().release(kind, &token);
            let err = GatewayError::StreamOpen(e);
            tracing::warn!(client = %session.id(), ?kind, error = %err, "subscribe failed");
            session.send_error(err);
            return None;
        }
    };

    // Superseded while the feed was opening
    if token.is_cancelled() {
        feed.close();
        return None;
    }

    let (forward, forwarded) = mpsc::channel(pump::FORWARD_BUFFER);
    let drain = pump::spawn_drain(feed.clone(), forward, session.id().to_string(), kind);
    let dispatch = pump::spawn_dispatch(
        feed,
        forwarded,
        session.clone(),
        kind,
        classifier(kind),
        token.clone(),
    );

    tracing::debug!(client = %session.id(), ?category, "subscription started");
    Some(SubscriptionHandle {
        kind,
        token,
        drain,
        dispatch,
    })
}

/// Stop the subscription of `kind`, if any
pub fn unsubscribe(session: &ClientSession, kind: CategoryKind) -> bool {
    session.cancel(kind)
}
