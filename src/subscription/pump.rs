//! Background tasks behind one subscription
//!
//! The drain task pulls change records from the feed and forwards them over
//! a bounded channel. The dispatch task races that channel against the
//! subscription's cancellation token, classifies records and enqueues events
//! on the client's outbound sink. Cancelling closes the feed, which in turn
//! unblocks the drain task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::classify::Classifier;
use super::CategoryKind;
use crate::error::GatewayError;
use crate::session::ClientSession;
use crate::store::ChangeFeed;
use crate::types::ChangeRecord;
use crate::utils::CancelToken;

/// Records buffered between the drain and dispatch tasks
pub(crate) const FORWARD_BUFFER: usize = 64;

pub(crate) fn spawn_drain(
    feed: Arc<dyn ChangeFeed>,
    forward: mpsc::Sender<ChangeRecord>,
    client: String,
    kind: CategoryKind,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(result) = feed.next().await {
            match result {
                Ok(change) => {
                    if forward.send(change).await.is_err() {
                        // Dispatch task is gone
                        break;
                    }
                }
                Err(e) => {
                    // Treated as the end of the feed; the client is not told
                    let err = GatewayError::StreamRead(e);
                    tracing::debug!(%client, ?kind, error = %err, "change feed ended with error");
                    break;
                }
            }
        }
        tracing::trace!(%client, ?kind, "drain task finished");
    })
}

pub(crate) fn spawn_dispatch(
    feed: Arc<dyn ChangeFeed>,
    mut forwarded: mpsc::Receiver<ChangeRecord>,
    session: Arc<ClientSession>,
    kind: CategoryKind,
    classify: Classifier,
    token: CancelToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(client = %session.id(), ?kind, "subscription cancelled");
                    break;
                }
                change = forwarded.recv() => match change {
                    Some(change) => {
                        if let Some(event) = classify(&change) {
                            session.send(event.into_message(kind));
                        }
                    }
                    None => {
                        // Feed exhausted; forget this subscription unless it was replaced
                        session.subscriptions().release(kind, &token);
                        tracing::debug!(client = %session.id(), ?kind, "change feed exhausted");
                        break;
                    }
                },
            }
        }
        feed.close();
    })
}
