use super::room::Room;
use serde::Serialize;

/// A teacher on one room's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Teacher {
    pub name: String,
    pub room: Room,
}

impl Teacher {
    pub fn new(name: &str, room: Room) -> Self {
        Self {
            name: name.trim().to_string(),
            room,
        }
    }
}
