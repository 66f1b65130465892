//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

/// Server running in-process on an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let handle = tokio::spawn(async move {
            if let Err(e) = hiroba_server::serve(listener).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// WebSocket client speaking the `{event, data}` envelope
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let (ws, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        Self { ws }
    }

    pub async fn send(&mut self, event: &str, data: Value) {
        let frame = json!({"event": event, "data": data}).to_string();
        self.send_raw(&frame).await;
    }

    pub async fn send_raw(&mut self, frame: &str) {
        self.ws
            .send(Message::Text(frame.into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next envelope, failing the test after a short timeout.
    pub async fn next_event(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(Duration::from_secs(2), self.ws.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("WebSocket closed")
                .expect("WebSocket error");

            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
        }
    }

    /// Skip frames until one with the given event name arrives.
    pub async fn expect_event(&mut self, name: &str) -> Value {
        loop {
            let frame = self.next_event().await;
            if frame["event"] == name {
                return frame["data"].clone();
            }
        }
    }

    /// Claim a nickname and wait for the acknowledgement.
    pub async fn claim(&mut self, nickname: &str) -> Value {
        self.send("check-nickname", json!(nickname)).await;
        self.expect_event("nickname-status").await
    }

    /// Join a room and wait for the room's users-list.
    ///
    /// Global listings still queued from before the join are skipped: the
    /// room listing is the first one that names the joiner.
    pub async fn join(&mut self, room_id: &str, name: &str) -> Value {
        self.send(
            "join-room",
            json!({"roomId": room_id, "user": {"name": name}}),
        )
        .await;
        loop {
            let users = self.expect_event("users-list").await;
            let listed = users["nicknames"]
                .as_array()
                .is_some_and(|names| names.iter().any(|n| n == name));
            if listed {
                return users;
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
