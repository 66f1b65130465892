//! UseCase: ニックネーム確認・確保処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CheckNicknameUseCase::execute() メソッド
//! - ニックネームの検証・確保と、参加通知・一覧の配信
//!
//! ### なぜこのテストが必要か
//! - ニックネームの一意性を保証
//! - 拒否理由が要求元の接続にだけ返ることを確認
//! - 参加通知が本人以外のグローバル参加者に届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規確保
//! - 異常系：使用中・不正なニックネーム、別名への変更
//! - エッジケース：同じニックネームでの再確認（冪等）

use crate::{
    domain::{ConnectionId, Nickname, NicknameError, SystemNotice},
    infrastructure::dto::websocket::{NicknameStatusPayload, OutboundEvent},
};

use super::{
    context::{RelayContext, SharedRelay, system_message},
    error::RelayError,
};

/// ニックネーム確保のユースケース
pub struct CheckNicknameUseCase {
    relay: SharedRelay,
}

impl CheckNicknameUseCase {
    /// 新しい CheckNicknameUseCase を作成
    pub fn new(relay: SharedRelay) -> Self {
        Self { relay }
    }

    /// ニックネーム確保を実行
    ///
    /// 結果は成否に関わらず `nickname-status` として要求元に返す。
    ///
    /// # Returns
    ///
    /// * `Ok(Nickname)` - 確保済みのニックネーム
    /// * `Err(RelayError)` - 拒否または未登録の接続
    pub async fn execute(
        &self,
        id: &ConnectionId,
        candidate: &str,
    ) -> Result<Nickname, RelayError> {
        let mut guard = self.relay.lock().await;
        let ctx = &mut *guard;

        let current = ctx
            .state
            .sessions
            .get(id)
            .ok_or_else(|| RelayError::UnknownConnection(id.to_string()))?
            .nickname
            .clone();

        // 1. 既にニックネームを持つ接続
        if let Some(current) = current {
            if current.as_str() == candidate.trim() {
                ctx.transport.send_to(id, &accepted(&current));
                return Ok(current);
            }
            return Err(reject(ctx, id, NicknameError::AlreadyNamed(current.into_string())));
        }

        // 2. 検証と確保
        let nickname = match ctx.state.nicknames.claim(candidate) {
            Ok(nickname) => nickname,
            Err(e) => return Err(reject(ctx, id, e)),
        };
        ctx.state.sessions.set_nickname(id, nickname.clone())?;

        // 3. 本人へ結果、他のグローバル参加者へ参加通知、全員へ一覧
        ctx.transport.send_to(id, &accepted(&nickname));
        ctx.send_global(
            &system_message(SystemNotice::JoinedChat(nickname.to_string())),
            Some(id),
        );
        ctx.send_global_users_list();

        tracing::info!("Connection '{}' claimed nickname '{}'", id, nickname);
        Ok(nickname)
    }
}

fn accepted(nickname: &Nickname) -> OutboundEvent {
    OutboundEvent::NicknameStatus(NicknameStatusPayload::accepted(nickname.as_str()))
}

fn reject(ctx: &RelayContext, id: &ConnectionId, error: NicknameError) -> RelayError {
    ctx.transport.send_to(
        id,
        &OutboundEvent::NicknameStatus(NicknameStatusPayload::rejected(error.to_string())),
    );
    RelayError::Nickname(error)
}
