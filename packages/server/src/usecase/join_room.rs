//! UseCase: ルーム参加・退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() / LeaveRoomUseCase::execute()
//! - セッション・ルーム一覧・トランスポートのスコープが揃って更新されること
//!
//! ### なぜこのテストが必要か
//! - 参加通知は本人以外、一覧は本人を含むルーム全員に届くことを保証
//! - 別ルームへの再参加で旧ルームの退出処理が行われることを確認
//! - グローバル一覧からルーム参加者が外れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回参加、退出してグローバルへ戻る
//! - エッジケース：参加中の別ルームへの再参加、同名の表示名
//! - 異常系：不正なペイロード、未参加での退出

use crate::{
    domain::{ConnectionId, DisplayName, DisplayUser, RoomId, RoomMembership, SystemNotice},
    infrastructure::dto::websocket::JoinRoomPayload,
};

use super::{
    context::{SharedRelay, system_message},
    error::RelayError,
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    relay: SharedRelay,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(relay: SharedRelay) -> Self {
        Self { relay }
    }

    /// ルーム参加を実行
    ///
    /// 既に別のルームにいる場合は、先にそのルームからの退出として扱う。
    ///
    /// # Returns
    ///
    /// * `Ok(RoomMembership)` - 新しい所属
    /// * `Err(RelayError)` - 不正なペイロードまたは未登録の接続（破棄）
    pub async fn execute(
        &self,
        id: &ConnectionId,
        payload: JoinRoomPayload,
    ) -> Result<RoomMembership, RelayError> {
        let room_id = RoomId::new(payload.room_id)?;
        let name = DisplayName::new(payload.user.name)?;
        let membership =
            RoomMembership::new(room_id.clone(), DisplayUser::with_extra(name, payload.user.extra));

        let mut guard = self.relay.lock().await;
        let ctx = &mut *guard;

        let session = ctx
            .state
            .sessions
            .get(id)
            .ok_or_else(|| RelayError::UnknownConnection(id.to_string()))?;
        let leaves_global_list = session.is_global() && session.nickname.is_some();

        // 1. 旧ルームから退出（旧ルームへ退出通知）
        if let Some(previous) = ctx.leave_current_room(id) {
            tracing::info!(
                "Connection '{}' moved from room '{}' to '{}'",
                id,
                previous.room_id,
                room_id
            );
        }

        // 2. スコープ・セッション・一覧を更新
        ctx.transport.join_scope(id, &room_id);
        ctx.state.sessions.join_room(id, membership.clone())?;
        ctx.state
            .rooms
            .add_member(room_id.clone(), membership.user.name.clone());

        // 3. 本人以外へ参加通知、本人を含む全員へ一覧
        ctx.transport.broadcast_to_room(
            &room_id,
            &system_message(SystemNotice::JoinedRoom(membership.user.name.to_string())),
            std::slice::from_ref(id),
        );
        ctx.send_room_users_list(&room_id);

        // 4. グローバル一覧から外れた分を反映
        if leaves_global_list {
            ctx.send_global_users_list();
        }

        Ok(membership)
    }
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    relay: SharedRelay,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(relay: SharedRelay) -> Self {
        Self { relay }
    }

    /// ルーム退出を実行し、グローバルスコープへ戻す
    pub async fn execute(&self, id: &ConnectionId) -> Result<RoomMembership, RelayError> {
        let mut guard = self.relay.lock().await;
        let ctx = &mut *guard;

        let named = ctx
            .state
            .sessions
            .get(id)
            .ok_or_else(|| RelayError::UnknownConnection(id.to_string()))?
            .nickname
            .is_some();

        let membership = ctx
            .leave_current_room(id)
            .ok_or_else(|| RelayError::NotInRoom(id.to_string()))?;

        // 戻ってきた本人を含むグローバル全員へ最新一覧
        if named {
            ctx.send_global_users_list();
        }

        Ok(membership)
    }
}
