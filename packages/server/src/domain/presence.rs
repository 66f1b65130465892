//! Presence computations for the global scope and for rooms.
//!
//! Everything here is a pure read over the registries; the router decides
//! when and to whom the results are delivered.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    room_index::RoomIndex,
    session_registry::SessionRegistry,
    value_object::{ConnectionId, RoomId},
};

/// Sender name attached to system messages
pub const SYSTEM_SENDER: &str = "Server";

/// Sender name used for global chat lines from sessions without a nickname
pub const ANONYMOUS_SENDER: &str = "Anonymous";

/// Presence listing of one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersList {
    pub nicknames: Vec<String>,
    pub count: usize,
}

impl UsersList {
    pub fn new(nicknames: Vec<String>) -> Self {
        let count = nicknames.len();
        Self { nicknames, count }
    }
}

/// Text of a system message announcing a presence change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemNotice {
    JoinedChat(String),
    LeftChat(String),
    JoinedRoom(String),
    LeftRoom(String),
}

impl fmt::Display for SystemNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JoinedChat(name) => write!(f, "{name} joined the chat"),
            Self::LeftChat(name) => write!(f, "{name} left the chat"),
            Self::JoinedRoom(name) => write!(f, "{name} joined the room"),
            Self::LeftRoom(name) => write!(f, "{name} left the room"),
        }
    }
}

pub struct PresenceBroadcaster;

impl PresenceBroadcaster {
    /// Nicknames of every named session in the global scope, sorted.
    ///
    /// Anonymous sessions receive global traffic but are not listed.
    pub fn global_users_list(registry: &SessionRegistry) -> UsersList {
        let mut nicknames: Vec<String> = registry
            .global_sessions()
            .filter_map(|s| s.nickname.as_ref())
            .map(|n| n.as_str().to_string())
            .collect();
        nicknames.sort();
        UsersList::new(nicknames)
    }

    pub fn room_users_list(index: &RoomIndex, room_id: &RoomId) -> UsersList {
        index.snapshot(room_id)
    }

    /// Connections that should receive a global-scope event.
    pub fn global_audience(
        registry: &SessionRegistry,
        except: Option<&ConnectionId>,
    ) -> Vec<ConnectionId> {
        registry
            .global_sessions()
            .filter(|s| Some(&s.id) != except)
            .map(|s| s.id.clone())
            .collect()
    }
}
