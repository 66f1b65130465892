//! Aggregate of all relay state.

use super::{
    nickname_ledger::NicknameLedger, room_index::RoomIndex, session_registry::SessionRegistry,
};

/// Ledger, registry and index, always mutated together under one lock.
#[derive(Debug, Default)]
pub struct ChatState {
    pub nicknames: NicknameLedger,
    pub sessions: SessionRegistry,
    pub rooms: RoomIndex,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }
}
