//! Domain layer for the relay.
//!
//! This module contains the presence state and its rules, independent of
//! data transfer objects (DTOs) and transport concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod nickname_ledger;
pub mod presence;
pub mod room_index;
pub mod session_registry;
pub mod state;
pub mod value_object;

pub use entity::{DisplayUser, RoomMembership, Session};
pub use error::{NicknameError, SessionError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use nickname_ledger::NicknameLedger;
pub use presence::{ANONYMOUS_SENDER, PresenceBroadcaster, SYSTEM_SENDER, SystemNotice, UsersList};
pub use room_index::RoomIndex;
pub use session_registry::SessionRegistry;
pub use state::ChatState;
pub use value_object::{ConnectionId, DisplayName, Nickname, RoomId};
