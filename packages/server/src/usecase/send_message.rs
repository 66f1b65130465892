//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase のグローバル／ルーム向けテキスト・ファイル送信
//! - 配信対象がスコープ内に限定されること
//!
//! ### なぜこのテストが必要か
//! - メッセージがスコープの境界を越えないことを保証
//! - ルーム未参加のルーム送信が黙って破棄されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：グローバル送信（送信者自身にも届く）、ルーム送信
//! - 異常系：ルーム未参加でのルーム送信
//! - エッジケース：ルーム参加中のグローバル送信（本人には戻らない）
//! - エッジケース：ニックネーム未確定の送信者（Anonymous）

use hiroba_shared::time::format_clock_time;

use crate::{
    domain::{ANONYMOUS_SENDER, ConnectionId, RoomMembership, Session},
    infrastructure::dto::websocket::{
        ChatMessagePayload, FileMessagePayload, FileUploadPayload, OutboundEvent,
        RoomFileUploadPayload,
    },
};

use super::{
    context::{RelayContext, SharedRelay},
    error::RelayError,
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    relay: SharedRelay,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(relay: SharedRelay) -> Self {
        Self { relay }
    }

    /// グローバルチャットへのテキスト送信
    ///
    /// 全グローバル参加者へ配信する。送信者がルーム参加中なら本人には戻らない。
    pub async fn send_global(
        &self,
        id: &ConnectionId,
        message: String,
    ) -> Result<(), RelayError> {
        let ctx = self.relay.lock().await;
        let nickname = global_sender_name(&ctx, id)?;

        let event = OutboundEvent::Message(ChatMessagePayload {
            nickname,
            message,
            time: format_clock_time(),
        });
        ctx.send_global(&event, None);
        Ok(())
    }

    /// グローバルチャットへのファイル共有
    ///
    /// 表示時刻はクライアントが付けたものを優先する。
    pub async fn send_global_file(
        &self,
        id: &ConnectionId,
        payload: FileUploadPayload,
    ) -> Result<(), RelayError> {
        let ctx = self.relay.lock().await;
        let nickname = global_sender_name(&ctx, id)?;

        let event = OutboundEvent::FileMessage(FileMessagePayload {
            nickname,
            file_type: payload.file_type,
            file_name: payload.file_name,
            file_data: payload.file_data,
            time: payload.time.unwrap_or_else(format_clock_time),
        });
        ctx.send_global(&event, None);
        Ok(())
    }

    /// 参加中ルームへのテキスト送信
    pub async fn send_room(
        &self,
        id: &ConnectionId,
        message: String,
    ) -> Result<(), RelayError> {
        let ctx = self.relay.lock().await;
        let membership = current_room(&ctx, id)?;

        let event = OutboundEvent::Message(ChatMessagePayload {
            nickname: membership.user.name.to_string(),
            message,
            time: format_clock_time(),
        });
        ctx.transport
            .broadcast_to_room(&membership.room_id, &event, &[]);
        Ok(())
    }

    /// 参加中ルームへのファイル共有
    pub async fn send_room_file(
        &self,
        id: &ConnectionId,
        payload: RoomFileUploadPayload,
    ) -> Result<(), RelayError> {
        let ctx = self.relay.lock().await;
        let membership = current_room(&ctx, id)?;

        let event = OutboundEvent::FileMessage(FileMessagePayload {
            nickname: membership.user.name.to_string(),
            file_type: payload.file_type,
            file_name: payload.file_name,
            file_data: payload.file_data,
            time: format_clock_time(),
        });
        ctx.transport
            .broadcast_to_room(&membership.room_id, &event, &[]);
        Ok(())
    }
}

fn session<'a>(ctx: &'a RelayContext, id: &ConnectionId) -> Result<&'a Session, RelayError> {
    ctx.state
        .sessions
        .get(id)
        .ok_or_else(|| RelayError::UnknownConnection(id.to_string()))
}

/// グローバル送信者の表示名（ニックネーム未確定なら Anonymous）
fn global_sender_name(ctx: &RelayContext, id: &ConnectionId) -> Result<String, RelayError> {
    let session = session(ctx, id)?;
    Ok(session
        .nickname
        .as_ref()
        .map_or_else(|| ANONYMOUS_SENDER.to_string(), |n| n.to_string()))
}

fn current_room<'a>(
    ctx: &'a RelayContext,
    id: &ConnectionId,
) -> Result<&'a RoomMembership, RelayError> {
    session(ctx, id)?;
    ctx.state
        .sessions
        .room_membership(id)
        .ok_or_else(|| RelayError::NotInRoom(id.to_string()))
}
