//! Core domain models for the relay.

use serde::Serialize;
use serde_json::{Map, Value};

use super::value_object::{ConnectionId, DisplayName, Nickname, RoomId};

/// Room-scoped identity supplied by the client on `join-room`.
///
/// Only `name` is interpreted; any other fields the client sent are kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayUser {
    pub name: DisplayName,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DisplayUser {
    /// Create a display user without extra attributes
    pub fn new(name: DisplayName) -> Self {
        Self {
            name,
            extra: Map::new(),
        }
    }

    /// Create a display user carrying extra client attributes
    pub fn with_extra(name: DisplayName, extra: Map<String, Value>) -> Self {
        Self { name, extra }
    }
}

/// The room a session currently belongs to, together with the identity it
/// uses there. Room and display user are always set or cleared together.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomMembership {
    pub room_id: RoomId,
    pub user: DisplayUser,
}

impl RoomMembership {
    pub fn new(room_id: RoomId, user: DisplayUser) -> Self {
        Self { room_id, user }
    }
}

/// Server-side state of one live connection
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Connection identifier
    pub id: ConnectionId,
    /// Global nickname, once claimed
    pub nickname: Option<Nickname>,
    /// Current room, if any. `None` means the session is in the global scope.
    pub room: Option<RoomMembership>,
}

impl Session {
    /// Create an anonymous session in the global scope
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            nickname: None,
            room: None,
        }
    }

    /// Whether the session is in the global scope (no room joined)
    pub fn is_global(&self) -> bool {
        self.room.is_none()
    }
}
