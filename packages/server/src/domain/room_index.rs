//! Room membership index: room identifier to the display names inside it.

use std::collections::{BTreeMap, HashMap};

use super::{
    presence::UsersList,
    value_object::{DisplayName, RoomId},
};

/// Display names per room.
///
/// Names, not sessions, are listed: two sessions sharing a name in one room
/// show up once. Each name carries a holder count so it only disappears once
/// its last holder is gone. Rooms are never pruned once created.
#[derive(Debug, Default)]
pub struct RoomIndex {
    rooms: HashMap<RoomId, BTreeMap<DisplayName, usize>>,
}

impl RoomIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, room_id: RoomId, name: DisplayName) {
        *self.rooms.entry(room_id).or_default().entry(name).or_insert(0) += 1;
    }

    /// Drop one holder of `name`. Returns `true` if the name left the listing.
    pub fn remove_member(&mut self, room_id: &RoomId, name: &DisplayName) -> bool {
        let Some(members) = self.rooms.get_mut(room_id) else {
            return false;
        };
        match members.get_mut(name) {
            Some(holders) if *holders > 1 => {
                *holders -= 1;
                false
            }
            Some(_) => {
                members.remove(name);
                true
            }
            None => false,
        }
    }

    /// Current listing for a room. Unknown rooms list nobody.
    pub fn snapshot(&self, room_id: &RoomId) -> UsersList {
        let nicknames = self
            .rooms
            .get(room_id)
            .map(|members| members.keys().map(|n| n.as_str().to_string()).collect())
            .unwrap_or_default();
        UsersList::new(nicknames)
    }

    pub fn contains(&self, room_id: &RoomId, name: &DisplayName) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|members| members.contains_key(name))
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Every room ever joined, sorted.
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.keys().cloned().collect();
        ids.sort();
        ids
    }
}
