//! ChatRouter: 受信イベントの振り分け窓口
//!
//! UI 層はこの型だけを通してリレーの状態に触れる。イベントごとに対応する
//! ユースケースを呼び出し、前提条件を満たさないイベントはエラーとして返す
//! （呼び出し側でログに残して破棄する）。

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{ConnectionId, PresenceBroadcaster, RoomId, Session, UsersList},
    infrastructure::{ConnectionHub, Transport, dto::websocket::InboundEvent},
};

use super::{
    check_nickname::CheckNicknameUseCase,
    connect_participant::ConnectParticipantUseCase,
    context::{RelayContext, SharedRelay},
    disconnect_participant::DisconnectParticipantUseCase,
    error::RelayError,
    join_room::{JoinRoomUseCase, LeaveRoomUseCase},
    send_message::SendMessageUseCase,
};

/// リレー全体の窓口
#[derive(Clone)]
pub struct ChatRouter {
    relay: SharedRelay,
}

impl ChatRouter {
    /// 任意のトランスポートで ChatRouter を作成
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            relay: RelayContext::new(transport).into_shared(),
        }
    }

    /// インメモリの ConnectionHub を使う ChatRouter を作成
    pub fn with_hub() -> Self {
        Self::new(Box::new(ConnectionHub::new()))
    }

    /// 共有状態へのハンドル
    pub fn relay(&self) -> SharedRelay {
        self.relay.clone()
    }

    /// 新しい接続を登録
    pub async fn connect(
        &self,
        id: ConnectionId,
        sender: UnboundedSender<String>,
    ) -> Result<(), RelayError> {
        ConnectParticipantUseCase::new(self.relay.clone())
            .execute(id, sender)
            .await
    }

    /// 受信イベントを処理
    pub async fn dispatch(
        &self,
        id: &ConnectionId,
        event: InboundEvent,
    ) -> Result<(), RelayError> {
        match event {
            InboundEvent::CheckNickname(candidate) => {
                CheckNicknameUseCase::new(self.relay.clone())
                    .execute(id, &candidate)
                    .await?;
            }
            InboundEvent::UserMessage(message) => {
                SendMessageUseCase::new(self.relay.clone())
                    .send_global(id, message)
                    .await?;
            }
            InboundEvent::FileUpload(payload) => {
                SendMessageUseCase::new(self.relay.clone())
                    .send_global_file(id, payload)
                    .await?;
            }
            InboundEvent::JoinRoom(payload) => {
                JoinRoomUseCase::new(self.relay.clone())
                    .execute(id, payload)
                    .await?;
            }
            InboundEvent::LeaveRoom => {
                LeaveRoomUseCase::new(self.relay.clone()).execute(id).await?;
            }
            InboundEvent::RoomMessage(payload) => {
                SendMessageUseCase::new(self.relay.clone())
                    .send_room(id, payload.message)
                    .await?;
            }
            InboundEvent::RoomFileUpload(payload) => {
                SendMessageUseCase::new(self.relay.clone())
                    .send_room_file(id, payload)
                    .await?;
            }
        }
        Ok(())
    }

    /// 接続の切断を処理
    pub async fn disconnect(&self, id: &ConnectionId) -> Result<Session, RelayError> {
        DisconnectParticipantUseCase::new(self.relay.clone())
            .execute(id)
            .await
    }

    /// グローバルスコープの参加者一覧
    pub async fn global_users(&self) -> UsersList {
        let ctx = self.relay.lock().await;
        PresenceBroadcaster::global_users_list(&ctx.state.sessions)
    }

    /// ルームの参加者一覧（未知のルームは `None`）
    pub async fn room_users(&self, room_id: &RoomId) -> Option<UsersList> {
        let ctx = self.relay.lock().await;
        ctx.state
            .rooms
            .contains_room(room_id)
            .then(|| PresenceBroadcaster::room_users_list(&ctx.state.rooms, room_id))
    }

    /// 既知のルームとその人数
    pub async fn rooms(&self) -> Vec<(RoomId, usize)> {
        let ctx = self.relay.lock().await;
        ctx.state
            .rooms
            .room_ids()
            .into_iter()
            .map(|room_id| {
                let count = ctx.state.rooms.snapshot(&room_id).count;
                (room_id, count)
            })
            .collect()
    }
}
