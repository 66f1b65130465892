//! UseCase: 接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - セッション作成とトランスポートへの登録
//!
//! ### なぜこのテストが必要か
//! - 接続直後のセッションは匿名・グローバルスコープであることを保証
//! - 同じ接続 ID の二重登録で既存セッションが壊れないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - 異常系：重複した接続 ID での登録試行

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::ConnectionId;

use super::{context::SharedRelay, error::RelayError};

/// 接続のユースケース
pub struct ConnectParticipantUseCase {
    relay: SharedRelay,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(relay: SharedRelay) -> Self {
        Self { relay }
    }

    /// 接続を実行
    ///
    /// 何も配信しない。ニックネーム確定までは一覧にも載らない。
    ///
    /// # Arguments
    ///
    /// * `id` - 接続 ID
    /// * `sender` - この接続へのフレーム送信チャンネル
    pub async fn execute(
        &self,
        id: ConnectionId,
        sender: UnboundedSender<String>,
    ) -> Result<(), RelayError> {
        let mut guard = self.relay.lock().await;
        let ctx = &mut *guard;

        if !ctx.state.sessions.create(id.clone()) {
            return Err(RelayError::DuplicateConnection(id.to_string()));
        }
        ctx.transport.register(id, sender);

        Ok(())
    }
}
