//! 共有状態（単一の調停点）
//!
//! ドメイン状態とトランスポートを 1 つの `Mutex` にまとめる。各ユースケースは
//! ロックを 1 回だけ取得し、状態変更とそれに伴う配信をロック内で完結させる。
//! これにより配信される一覧は、常にそれを引き起こした変更と整合する。

use std::sync::Arc;

use hiroba_shared::time::format_clock_time;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ChatState, ConnectionId, PresenceBroadcaster, RoomId, RoomMembership, SYSTEM_SENDER,
        SystemNotice,
    },
    infrastructure::{
        Transport,
        dto::websocket::{ChatMessagePayload, OutboundEvent},
    },
};

/// ロックで保護された状態とトランスポート
pub struct RelayContext {
    pub state: ChatState,
    pub transport: Box<dyn Transport>,
}

/// ユースケース間で共有するハンドル
pub type SharedRelay = Arc<Mutex<RelayContext>>;

impl RelayContext {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            state: ChatState::new(),
            transport,
        }
    }

    pub fn into_shared(self) -> SharedRelay {
        Arc::new(Mutex::new(self))
    }

    /// グローバルスコープの全セッション（`except` を除く）に配信
    pub(crate) fn send_global(&self, event: &OutboundEvent, except: Option<&ConnectionId>) {
        for id in PresenceBroadcaster::global_audience(&self.state.sessions, except) {
            self.transport.send_to(&id, event);
        }
    }

    /// グローバルスコープの参加者一覧を全グローバルセッションに配信
    pub(crate) fn send_global_users_list(&self) {
        let list = PresenceBroadcaster::global_users_list(&self.state.sessions);
        self.send_global(&OutboundEvent::UsersList(list), None);
    }

    /// ルームの参加者一覧をルーム全員に配信
    pub(crate) fn send_room_users_list(&self, room_id: &RoomId) {
        let list = PresenceBroadcaster::room_users_list(&self.state.rooms, room_id);
        self.transport
            .broadcast_to_room(room_id, &OutboundEvent::UsersList(list), &[]);
    }

    /// 現在のルームから退出させ、残りのメンバーに通知する
    ///
    /// ルームに参加していなければ何もしない。
    pub(crate) fn leave_current_room(&mut self, id: &ConnectionId) -> Option<RoomMembership> {
        let membership = self.state.sessions.leave_room(id)?;
        self.state
            .rooms
            .remove_member(&membership.room_id, &membership.user.name);
        self.transport.leave_scope(id, &membership.room_id);
        self.announce_room_departure(&membership);
        Some(membership)
    }

    /// 退出済みのメンバーについて「left the room」と最新一覧を配信
    pub(crate) fn announce_room_departure(&self, membership: &RoomMembership) {
        let notice = SystemNotice::LeftRoom(membership.user.name.to_string());
        self.transport
            .broadcast_to_room(&membership.room_id, &system_message(notice), &[]);
        self.send_room_users_list(&membership.room_id);
    }
}

/// サーバー発のシステムメッセージを組み立てる
pub fn system_message(notice: SystemNotice) -> OutboundEvent {
    OutboundEvent::Message(ChatMessagePayload {
        nickname: SYSTEM_SENDER.to_string(),
        message: notice.to_string(),
        time: format_clock_time(),
    })
}
