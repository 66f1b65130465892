//! In-memory connection hub
//!
//! Holds the outbound `mpsc` sender of every live WebSocket connection and
//! the transport-level room membership used for room fan-out.

use std::collections::{HashMap, HashSet};

use hiroba_shared::time::get_timestamp_millis;
use tokio::sync::mpsc::UnboundedSender;

use super::Transport;
use crate::{
    domain::{ConnectionId, RoomId},
    infrastructure::dto::websocket::OutboundEvent,
};

/// Client connection information
struct ClientInfo {
    /// Message sender channel
    sender: UnboundedSender<String>,
    /// Unix timestamp when connected (milliseconds)
    connected_at: i64,
    /// Transport scope the connection is subscribed to
    scope: Option<RoomId>,
}

#[derive(Default)]
pub struct ConnectionHub {
    clients: HashMap<ConnectionId, ClientInfo>,
    scopes: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_connected_clients(&self) -> usize {
        self.clients.len()
    }

    fn encode(event: &OutboundEvent) -> Option<String> {
        match serde_json::to_string(event) {
            Ok(frame) => Some(frame),
            Err(e) => {
                tracing::error!("Failed to serialize outbound event: {}", e);
                None
            }
        }
    }

    fn push(&self, id: &ConnectionId, frame: String) {
        match self.clients.get(id) {
            Some(client) => {
                if client.sender.send(frame).is_err() {
                    tracing::warn!("Failed to send to connection '{}': channel closed", id);
                }
            }
            None => tracing::debug!("Skipping send to unknown connection '{}'", id),
        }
    }

    fn detach_scope(&mut self, id: &ConnectionId, room_id: &RoomId) {
        if let Some(members) = self.scopes.get_mut(room_id) {
            members.remove(id);
            if members.is_empty() {
                self.scopes.remove(room_id);
            }
        }
    }
}

impl Transport for ConnectionHub {
    fn register(&mut self, id: ConnectionId, sender: UnboundedSender<String>) {
        self.clients.insert(
            id,
            ClientInfo {
                sender,
                connected_at: get_timestamp_millis(),
                scope: None,
            },
        );
        tracing::debug!(
            "Connection registered, {} connection(s) live",
            self.count_connected_clients()
        );
    }

    fn unregister(&mut self, id: &ConnectionId) {
        let Some(info) = self.clients.remove(id) else {
            return;
        };
        if let Some(room_id) = &info.scope {
            self.detach_scope(id, room_id);
        }
        tracing::debug!(
            "Connection '{}' unregistered after {} ms, {} connection(s) left",
            id,
            get_timestamp_millis() - info.connected_at,
            self.count_connected_clients()
        );
    }

    fn send_to(&self, id: &ConnectionId, event: &OutboundEvent) {
        if let Some(frame) = Self::encode(event) {
            self.push(id, frame);
        }
    }

    fn broadcast_to_room(
        &self,
        room_id: &RoomId,
        event: &OutboundEvent,
        except: &[ConnectionId],
    ) {
        let Some(members) = self.scopes.get(room_id) else {
            return;
        };
        let Some(frame) = Self::encode(event) else {
            return;
        };
        for id in members.iter().filter(|id| !except.contains(id)) {
            self.push(id, frame.clone());
        }
    }

    fn join_scope(&mut self, id: &ConnectionId, room_id: &RoomId) {
        let Some(client) = self.clients.get_mut(id) else {
            tracing::debug!("Ignoring scope join for unknown connection '{}'", id);
            return;
        };
        let previous = client.scope.replace(room_id.clone());
        if let Some(old) = previous
            && &old != room_id
        {
            self.detach_scope(id, &old);
        }
        self.scopes
            .entry(room_id.clone())
            .or_default()
            .insert(id.clone());
    }

    fn leave_scope(&mut self, id: &ConnectionId, room_id: &RoomId) {
        if let Some(client) = self.clients.get_mut(id)
            && client.scope.as_ref() == Some(room_id)
        {
            client.scope = None;
        }
        self.detach_scope(id, room_id);
    }

    fn unscoped_connections(&self) -> Vec<ConnectionId> {
        self.clients
            .iter()
            .filter(|(_, info)| info.scope.is_none())
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::UsersList, infrastructure::dto::websocket::NicknameStatusPayload};
    use tokio::sync::mpsc;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn users_list_event() -> OutboundEvent {
        OutboundEvent::UsersList(UsersList::new(vec!["alice".to_string()]))
    }

    #[test]
    fn test_register_and_send_to() {
        // テスト項目: 登録した接続に単一配信できる
        // given (前提条件):
        let mut hub = ConnectionHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.register(conn("a"), tx);

        // when (操作):
        hub.send_to(
            &conn("a"),
            &OutboundEvent::NicknameStatus(NicknameStatusPayload::accepted("alice")),
        );

        // then (期待する結果):
        let frame = rx.try_recv().unwrap();
        let json: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["event"], "nickname-status");
        assert_eq!(json["data"]["nickname"], "alice");
        assert!(hub.clients.get(&conn("a")).unwrap().connected_at > 0);
    }

    #[test]
    fn test_broadcast_to_room_only_reaches_members() {
        // テスト項目: ルーム配信はそのルームの接続にのみ届き、除外指定も効く
        // given (前提条件):
        let mut hub = ConnectionHub::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        hub.register(conn("a"), tx_a);
        hub.register(conn("b"), tx_b);
        hub.register(conn("c"), tx_c);
        hub.join_scope(&conn("a"), &room("r1"));
        hub.join_scope(&conn("b"), &room("r1"));

        // when (操作):
        hub.broadcast_to_room(&room("r1"), &users_list_event(), &[conn("b")]);

        // then (期待する結果):
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
        assert!(rx_c.try_recv().is_err());
    }

    #[test]
    fn test_join_scope_moves_between_rooms() {
        // テスト項目: 別のルームに参加すると以前のスコープから外れる
        // given (前提条件):
        let mut hub = ConnectionHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.register(conn("a"), tx);
        hub.join_scope(&conn("a"), &room("r1"));

        // when (操作):
        hub.join_scope(&conn("a"), &room("r2"));
        hub.broadcast_to_room(&room("r1"), &users_list_event(), &[]);

        // then (期待する結果):
        assert!(rx.try_recv().is_err());
        assert_eq!(
            hub.clients.get(&conn("a")).unwrap().scope,
            Some(room("r2"))
        );
    }

    #[test]
    fn test_unscoped_connections_tracks_scope_changes() {
        // テスト項目: スコープに属さない接続の一覧が参加・退出に追従する
        // given (前提条件):
        let mut hub = ConnectionHub::new();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        hub.register(conn("a"), tx_a);
        hub.register(conn("b"), tx_b);

        // when (操作):
        hub.join_scope(&conn("a"), &room("r1"));

        // then (期待する結果):
        assert_eq!(hub.unscoped_connections(), vec![conn("b")]);

        // when (操作):
        hub.leave_scope(&conn("a"), &room("r1"));
        let mut unscoped = hub.unscoped_connections();
        unscoped.sort();

        // then (期待する結果):
        assert_eq!(unscoped, vec![conn("a"), conn("b")]);
    }

    #[test]
    fn test_unregister_drops_scope_membership() {
        // テスト項目: 登録解除した接続にはルーム配信が届かない
        // given (前提条件):
        let mut hub = ConnectionHub::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register(conn("a"), tx_a);
        hub.register(conn("b"), tx_b);
        hub.join_scope(&conn("a"), &room("r1"));
        hub.join_scope(&conn("b"), &room("r1"));

        // when (操作):
        hub.unregister(&conn("a"));
        hub.broadcast_to_room(&room("r1"), &users_list_event(), &[]);

        // then (期待する結果):
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_ok());
        assert_eq!(hub.count_connected_clients(), 1);
    }

    #[test]
    fn test_send_to_closed_channel_is_ignored() {
        // テスト項目: 受信側が閉じた接続への送信はパニックせずに無視される
        // given (前提条件):
        let mut hub = ConnectionHub::new();
        let (tx, rx) = mpsc::unbounded_channel();
        hub.register(conn("a"), tx);
        drop(rx);

        // when (操作) / then (期待する結果):
        hub.send_to(&conn("a"), &users_list_event());
        hub.send_to(&conn("ghost"), &users_list_event());
    }
}
