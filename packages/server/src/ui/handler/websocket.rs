//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory},
    infrastructure::dto::websocket::InboundEvent,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let id = match ConnectionIdFactory::generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to allocate connection id: {}", e);
            return;
        }
    };

    // Create a channel for this connection to receive frames
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    if let Err(e) = state.router.connect(id.clone(), tx).await {
        tracing::warn!("Rejecting connection '{}': {}", id, e);
        return;
    }
    tracing::info!("Connection '{}' opened", id);

    let (mut sender, mut receiver) = socket.split();

    // Spawn a task to receive events from this connection
    let recv_state = state.clone();
    let recv_id = id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => handle_text(&recv_state, &recv_id, text.as_str()).await,
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward relayed frames to this connection
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state.router.disconnect(&id).await {
        Ok(session) => tracing::info!(
            "Connection '{}' closed (nickname: {:?}, room: {:?})",
            id,
            session.nickname.as_ref().map(|n| n.as_str()),
            session.room.as_ref().map(|m| m.room_id.as_str())
        ),
        Err(e) => tracing::warn!("Failed to clean up connection '{}': {}", id, e),
    }
}

/// Parse and dispatch one text frame. Anything unusable is logged and dropped.
async fn handle_text(state: &AppState, id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<InboundEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Dropping malformed frame from '{}': {}", id, e);
            return;
        }
    };

    let name = event.name();
    tracing::debug!("Received '{}' from '{}'", name, id);
    if let Err(e) = state.router.dispatch(id, event).await {
        tracing::debug!("Dropped '{}' from '{}': {}", name, id, e);
    }
}
