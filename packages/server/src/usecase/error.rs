//! UseCase 層のエラー定義
//!
//! いずれも接続単位で握りつぶされ、プロセスや他の接続には波及しない。

use thiserror::Error;

use crate::domain::{NicknameError, SessionError, ValueObjectError};

/// イベント処理の失敗理由
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// 登録されていない（切断済みの）接続からのイベント
    #[error("Connection '{0}' is not registered")]
    UnknownConnection(String),

    /// 同じ接続 ID での二重登録
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),

    /// ルーム未参加でのルーム操作
    #[error("Connection '{0}' has not joined a room")]
    NotInRoom(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] ValueObjectError),

    #[error(transparent)]
    Nickname(#[from] NicknameError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
