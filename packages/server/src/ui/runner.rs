//! Router construction and server startup.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{config::ServerConfig, usecase::ChatRouter};

use super::{
    handler::{get_global_users, get_room_users, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the Axum application with all routes
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/users", get(get_global_users))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_id}/users", get(get_room_users))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until a shutdown signal arrives.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(ChatRouter::with_hub()));
    let app = build_app(state);

    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Bind to the configured address and run the server.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    serve(listener).await
}
