//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - セッション削除、ニックネーム解放、ルーム一覧からの削除と退出通知
//!
//! ### なぜこのテストが必要か
//! - 切断後に古い参加者が一覧に残らないことを保証
//! - 解放されたニックネームを他の接続が再取得できることを確認
//! - 退出通知がスコープ外に漏れないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：グローバル参加者の切断、ルーム参加者の切断
//! - エッジケース：匿名セッションの切断（通知なし）
//! - 異常系：未登録の接続の切断

use crate::domain::{ConnectionId, Session, SystemNotice};

use super::{
    context::{SharedRelay, system_message},
    error::RelayError,
};

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    relay: SharedRelay,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(relay: SharedRelay) -> Self {
        Self { relay }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 削除したセッションの最終状態
    /// * `Err(RelayError::UnknownConnection)` - 既に削除済み
    pub async fn execute(&self, id: &ConnectionId) -> Result<Session, RelayError> {
        let mut guard = self.relay.lock().await;
        let ctx = &mut *guard;

        // 1. セッション削除（トランスポート側のスコープもここで外れる）
        let session = ctx.state.sessions.remove(id);
        ctx.transport.unregister(id);
        let session = session.ok_or_else(|| RelayError::UnknownConnection(id.to_string()))?;

        // 2. グローバル側の後始末
        if let Some(nickname) = &session.nickname {
            ctx.state.nicknames.release(nickname);
            ctx.send_global(
                &system_message(SystemNotice::LeftChat(nickname.to_string())),
                None,
            );
            ctx.send_global_users_list();
        }

        // 3. ルーム側の後始末
        if let Some(membership) = &session.room {
            ctx.state
                .rooms
                .remove_member(&membership.room_id, &membership.user.name);
            ctx.announce_room_departure(membership);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, DisplayUser, Nickname, RoomId, RoomMembership},
        usecase::context::{
            SharedRelay,
            test_support::{TestClient, create_test_relay, events_named, message_texts},
        },
    };

    async fn name_client(relay: &SharedRelay, client: &TestClient, nickname: &str) {
        let mut ctx = relay.lock().await;
        let nickname = ctx.state.nicknames.claim(nickname).unwrap();
        ctx.state.sessions.set_nickname(&client.id, nickname).unwrap();
    }

    async fn seat_client(relay: &SharedRelay, client: &TestClient, room: &str, name: &str) {
        let mut guard = relay.lock().await;
        let ctx = &mut *guard;
        let room_id = RoomId::new(room.to_string()).unwrap();
        let name = DisplayName::new(name.to_string()).unwrap();
        ctx.transport.join_scope(&client.id, &room_id);
        ctx.state
            .sessions
            .join_room(
                &client.id,
                RoomMembership::new(room_id.clone(), DisplayUser::new(name.clone())),
            )
            .unwrap();
        ctx.state.rooms.add_member(room_id, name);
    }

    #[tokio::test]
    async fn test_disconnect_named_global_participant() {
        // テスト項目: ニックネームを持つグローバル参加者の切断で解放・通知が行われる
        // given (前提条件):
        let relay = create_test_relay();
        let alice = TestClient::connect(&relay, "a").await;
        let mut bob = TestClient::connect(&relay, "b").await;
        name_client(&relay, &alice, "alice").await;
        name_client(&relay, &bob, "bob").await;
        let usecase = DisconnectParticipantUseCase::new(relay.clone());

        // when (操作):
        let session = usecase.execute(&alice.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(session.nickname.unwrap().as_str(), "alice");
        let frames = bob.drain();
        assert_eq!(message_texts(&frames), vec!["alice left the chat"]);
        let lists = events_named(&frames, "users-list");
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0]["data"]["nicknames"], serde_json::json!(["bob"]));
        assert_eq!(lists[0]["data"]["count"], 1);

        // ニックネームは再取得できる
        let ctx = relay.lock().await;
        assert!(
            !ctx.state
                .nicknames
                .is_claimed(&Nickname::parse("alice").unwrap())
        );
    }

    #[tokio::test]
    async fn test_disconnect_room_participant_notifies_room_only() {
        // テスト項目: ルーム参加者の切断でルームにのみ退出通知と一覧が届く
        // given (前提条件):
        let relay = create_test_relay();
        let a = TestClient::connect(&relay, "a").await;
        let mut c = TestClient::connect(&relay, "c").await;
        let mut global = TestClient::connect(&relay, "g").await;
        seat_client(&relay, &a, "r1", "Bob").await;
        seat_client(&relay, &c, "r1", "Carol").await;
        let usecase = DisconnectParticipantUseCase::new(relay.clone());

        // when (操作):
        usecase.execute(&a.id).await.unwrap();

        // then (期待する結果):
        let frames = c.drain();
        assert_eq!(message_texts(&frames), vec!["Bob left the room"]);
        let lists = events_named(&frames, "users-list");
        assert_eq!(lists[0]["data"]["nicknames"], serde_json::json!(["Carol"]));
        assert_eq!(lists[0]["data"]["count"], 1);
        // グローバル側には何も届かない（匿名のルーム参加者だったため）
        assert!(global.drain().is_empty());

        let ctx = relay.lock().await;
        let room_id = RoomId::new("r1".to_string()).unwrap();
        assert!(
            !ctx.state
                .rooms
                .contains(&room_id, &DisplayName::new("Bob".to_string()).unwrap())
        );
    }

    #[tokio::test]
    async fn test_disconnect_anonymous_participant_is_silent() {
        // テスト項目: 匿名セッションの切断では何も配信されない
        // given (前提条件):
        let relay = create_test_relay();
        let a = TestClient::connect(&relay, "a").await;
        let mut b = TestClient::connect(&relay, "b").await;
        let usecase = DisconnectParticipantUseCase::new(relay.clone());

        // when (操作):
        let result = usecase.execute(&a.id).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(b.drain().is_empty());
        assert_eq!(relay.lock().await.state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_connection() {
        // テスト項目: 未登録の接続の切断はエラーになるが状態は変わらない
        // given (前提条件):
        let relay = create_test_relay();
        let _a = TestClient::connect(&relay, "a").await;
        let usecase = DisconnectParticipantUseCase::new(relay.clone());
        let ghost = ConnectionId::new("ghost".to_string()).unwrap();

        // when (操作):
        let result = usecase.execute(&ghost).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            RelayError::UnknownConnection("ghost".to_string())
        );
        assert_eq!(relay.lock().await.state.sessions.len(), 1);
    }
}
