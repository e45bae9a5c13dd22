//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};

use super::state::AppState;
use crate::error::GatewayError;
use crate::protocol::{Command, OutboundMessage};
use crate::session::{ClientSession, OutboundSink};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (outbound, mut queue) = OutboundSink::channel(state.config.outbound_capacity);
    let (mut sender, mut receiver) = socket.split();

    let session = match state.sessions.connect(outbound).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "refusing connection");
            if let Ok(json) = serde_json::to_string(&OutboundMessage::Error(e.to_string())) {
                let _ = sender.send(Message::Text(json)).await;
            }
            let _ = sender.close().await;
            return;
        }
    };

    // Single reader of the outbound queue
    let writer = tokio::spawn(async move {
        while let Some(message) = queue.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!(error = %e, kind = message.kind(), "failed to encode message");
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break; // Client disconnected
            }
        }
    });

    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => handle_frame(&state, &session, &text).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // Binary frames are ignored, ping/pong handled by axum
            Err(e) => {
                tracing::warn!(client = %session.id(), error = %e, "websocket error");
                break;
            }
        }
    }

    state.sessions.disconnect(&session).await;
    writer.abort();
}

/// Decode one text frame and dispatch the command it carries
pub async fn handle_frame(state: &AppState, session: &Arc<ClientSession>, text: &str) {
    match serde_json::from_str::<Command>(text) {
        Ok(command) => state.router.dispatch(session, command).await,
        Err(e) => {
            session.send_error(GatewayError::Frame(e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::store::{MemoryStore, Table};
    use std::time::Duration;

    #[tokio::test]
    async fn test_malformed_frame_replies_error() {
        let state = AppState::new(Arc::new(MemoryStore::new()), GatewayConfig::default());
        let (sink, mut rx) = OutboundSink::channel(8);
        let session = state.sessions.connect(sink).await.unwrap();

        handle_frame(&state, &session, "{not json").await;
        match rx.recv().await.unwrap() {
            OutboundMessage::Error(msg) => assert!(msg.starts_with("malformed frame")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_frame_is_dispatched() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), GatewayConfig::default());
        let (sink, _rx) = OutboundSink::channel(8);
        let session = state.sessions.connect(sink).await.unwrap();

        handle_frame(
            &state,
            &session,
            r#"{"type":"channel add","payload":{"name":"general"}}"#,
        )
        .await;

        tokio::time::timeout(Duration::from_secs(1), async {
            while store.documents(Table::Channel).is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("channel should be created");
    }
}
