use super::room::Room;
use serde::Serialize;

pub const DEFAULT_LEVEL: &str = "Intermediate";

/// Named class template in one room's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassType {
    pub name: String,
    pub room: Room,
    pub default_level: String,
}

impl ClassType {
    pub fn new(name: &str, room: Room, default_level: &str) -> Self {
        let level = default_level.trim();
        Self {
            name: name.trim().to_string(),
            room,
            default_level: if level.is_empty() {
                DEFAULT_LEVEL.to_string()
            } else {
                level.to_string()
            },
        }
    }
}
