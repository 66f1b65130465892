//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// DisplayName validation error
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// DisplayName too long error
    #[error("DisplayName cannot exceed {max} characters (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },
}

/// Reasons a nickname claim is rejected.
///
/// The `Display` output is what the claiming connection sees as `reason`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NicknameError {
    #[error("Nickname cannot be empty")]
    Empty,

    #[error("Nickname cannot exceed {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Nickname may only contain letters, digits and underscores (found {0:?})")]
    InvalidCharacter(char),

    #[error("Nickname '{0}' is reserved")]
    Reserved(String),

    #[error("Nickname '{0}' is already taken")]
    Taken(String),

    /// The connection already holds a different nickname
    #[error("This connection already uses the nickname '{0}'")]
    AlreadyNamed(String),
}

/// Errors related to the session registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No live session for connection '{0}'")]
    UnknownConnection(String),
}
