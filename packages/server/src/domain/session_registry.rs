//! Registry of live sessions, one per transport connection.

use std::collections::HashMap;

use super::{
    entity::{RoomMembership, Session},
    error::SessionError,
    value_object::{ConnectionId, Nickname},
};

/// Owns every [`Session`]. A session exists from connect until disconnect.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ConnectionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an anonymous, global session.
    ///
    /// Returns `false` and leaves the existing session untouched if the
    /// connection is already registered.
    pub fn create(&mut self, id: ConnectionId) -> bool {
        if self.sessions.contains_key(&id) {
            return false;
        }
        self.sessions.insert(id.clone(), Session::new(id));
        true
    }

    pub fn set_nickname(
        &mut self,
        id: &ConnectionId,
        nickname: Nickname,
    ) -> Result<(), SessionError> {
        let session = self.get_mut(id)?;
        session.nickname = Some(nickname);
        Ok(())
    }

    pub fn nickname(&self, id: &ConnectionId) -> Option<&Nickname> {
        self.sessions.get(id).and_then(|s| s.nickname.as_ref())
    }

    /// Put the session into `membership`'s room.
    ///
    /// Returns the membership it held before, if any. Callers that want leave
    /// side effects for the old room should call [`Self::leave_room`] first.
    pub fn join_room(
        &mut self,
        id: &ConnectionId,
        membership: RoomMembership,
    ) -> Result<Option<RoomMembership>, SessionError> {
        let session = self.get_mut(id)?;
        Ok(session.room.replace(membership))
    }

    /// Return the session to the global scope, handing back what it left.
    pub fn leave_room(&mut self, id: &ConnectionId) -> Option<RoomMembership> {
        self.sessions.get_mut(id).and_then(|s| s.room.take())
    }

    /// Delete the session, returning its final state for teardown.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn room_membership(&self, id: &ConnectionId) -> Option<&RoomMembership> {
        self.sessions.get(id).and_then(|s| s.room.as_ref())
    }

    /// Sessions that have not joined any room.
    pub fn list_global(&self) -> Vec<ConnectionId> {
        self.global_sessions().map(|s| s.id.clone()).collect()
    }

    pub(crate) fn global_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values().filter(|s| s.is_global())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn get_mut(&mut self, id: &ConnectionId) -> Result<&mut Session, SessionError> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownConnection(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, DisplayUser, RoomId};

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn membership(room: &str, name: &str) -> RoomMembership {
        RoomMembership::new(
            RoomId::new(room.to_string()).unwrap(),
            DisplayUser::new(DisplayName::new(name.to_string()).unwrap()),
        )
    }

    #[test]
    fn test_create_registers_anonymous_global_session() {
        // テスト項目: 作成したセッションはニックネームなしでグローバルに属する
        // given (前提条件):
        let mut registry = SessionRegistry::new();

        // when (操作):
        let created = registry.create(conn("a"));

        // then (期待する結果):
        assert!(created);
        assert!(registry.nickname(&conn("a")).is_none());
        assert_eq!(registry.list_global(), vec![conn("a")]);
    }

    #[test]
    fn test_create_twice_keeps_existing_session() {
        // テスト項目: 同じ接続で二重に作成しても既存セッションは上書きされない
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.create(conn("a"));
        registry
            .set_nickname(&conn("a"), Nickname::parse("alice").unwrap())
            .unwrap();

        // when (操作):
        let created = registry.create(conn("a"));

        // then (期待する結果):
        assert!(!created);
        assert_eq!(registry.nickname(&conn("a")).unwrap().as_str(), "alice");
    }

    #[test]
    fn test_set_nickname_unknown_connection_fails() {
        // テスト項目: 存在しない接続にニックネームを設定するとエラーになる
        // given (前提条件):
        let mut registry = SessionRegistry::new();

        // when (操作):
        let result = registry.set_nickname(&conn("ghost"), Nickname::parse("ghost").unwrap());

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            SessionError::UnknownConnection("ghost".to_string())
        );
    }

    #[test]
    fn test_join_room_moves_session_out_of_global_scope() {
        // テスト項目: ルームに参加したセッションはグローバル一覧から外れる
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.create(conn("a"));
        registry.create(conn("b"));

        // when (操作):
        let previous = registry.join_room(&conn("a"), membership("r1", "Bob"));

        // then (期待する結果):
        assert_eq!(previous.unwrap(), None);
        assert_eq!(registry.list_global(), vec![conn("b")]);
        assert_eq!(
            registry.room_membership(&conn("a")).unwrap().room_id.as_str(),
            "r1"
        );
    }

    #[test]
    fn test_join_room_returns_previous_membership() {
        // テスト項目: 別ルームに参加すると以前の所属が返される
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.create(conn("a"));
        registry.join_room(&conn("a"), membership("r1", "Bob")).unwrap();

        // when (操作):
        let previous = registry.join_room(&conn("a"), membership("r2", "Bobby"));

        // then (期待する結果):
        assert_eq!(previous.unwrap(), Some(membership("r1", "Bob")));
    }

    #[test]
    fn test_leave_room_returns_cleared_membership() {
        // テスト項目: ルーム退出で所属がクリアされ、グローバルに戻る
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.create(conn("a"));
        registry.join_room(&conn("a"), membership("r1", "Bob")).unwrap();

        // when (操作):
        let left = registry.leave_room(&conn("a"));

        // then (期待する結果):
        assert_eq!(left, Some(membership("r1", "Bob")));
        assert_eq!(registry.list_global(), vec![conn("a")]);
        assert_eq!(registry.leave_room(&conn("a")), None);
    }

    #[test]
    fn test_remove_returns_final_snapshot() {
        // テスト項目: セッション削除時に最終状態が返される
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.create(conn("a"));
        registry
            .set_nickname(&conn("a"), Nickname::parse("alice").unwrap())
            .unwrap();
        registry.join_room(&conn("a"), membership("r1", "Bob")).unwrap();

        // when (操作):
        let removed = registry.remove(&conn("a")).unwrap();

        // then (期待する結果):
        assert_eq!(removed.nickname.unwrap().as_str(), "alice");
        assert_eq!(removed.room, Some(membership("r1", "Bob")));
        assert!(registry.is_empty());
        assert!(registry.remove(&conn("a")).is_none());
    }
}
