//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から ChatRouter 経由で呼び出され、Domain 層を操作します。

pub mod check_nickname;
pub mod connect_participant;
pub mod context;
pub mod disconnect_participant;
pub mod error;
pub mod join_room;
pub mod router;
pub mod send_message;

pub use check_nickname::CheckNicknameUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use context::{RelayContext, SharedRelay};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::RelayError;
pub use join_room::{JoinRoomUseCase, LeaveRoomUseCase};
pub use router::ChatRouter;
pub use send_message::SendMessageUseCase;
