//! WebSocket message DTOs for the relay.
//!
//! Every frame is a JSON envelope `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::UsersList;

/// Events a client may send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum InboundEvent {
    CheckNickname(String),
    UserMessage(String),
    FileUpload(FileUploadPayload),
    JoinRoom(JoinRoomPayload),
    LeaveRoom,
    RoomMessage(RoomMessagePayload),
    RoomFileUpload(RoomFileUploadPayload),
}

impl InboundEvent {
    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckNickname(_) => "check-nickname",
            Self::UserMessage(_) => "user-message",
            Self::FileUpload(_) => "file-upload",
            Self::JoinRoom(_) => "join-room",
            Self::LeaveRoom => "leave-room",
            Self::RoomMessage(_) => "room-message",
            Self::RoomFileUpload(_) => "room-file-upload",
        }
    }
}

/// Global file share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadPayload {
    pub file_type: String,
    pub file_name: String,
    pub file_data: String,
    /// Client-side display time; the server fills it in when absent
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_id: String,
    pub user: DisplayUserDto,
}

/// Room identity as sent by the client; fields besides `name` pass through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayUserDto {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMessagePayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomFileUploadPayload {
    pub file_type: String,
    pub file_name: String,
    pub file_data: String,
}

/// Events the server sends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutboundEvent {
    NicknameStatus(NicknameStatusPayload),
    Message(ChatMessagePayload),
    FileMessage(FileMessagePayload),
    UsersList(UsersList),
}

/// Answer to `check-nickname`, sent to the claiming connection only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicknameStatusPayload {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl NicknameStatusPayload {
    pub fn accepted(nickname: impl Into<String>) -> Self {
        Self {
            success: true,
            nickname: Some(nickname.into()),
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            nickname: None,
            reason: Some(reason.into()),
        }
    }
}

/// Chat line, from a user or from the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    pub nickname: String,
    pub message: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMessagePayload {
    pub nickname: String,
    pub file_type: String,
    pub file_name: String,
    pub file_data: String,
    pub time: String,
}
