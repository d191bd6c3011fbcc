use serde::{Deserialize, Serialize};
use std::fmt;

/// Independent scheduling context with its own roster, catalog and grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Room {
    Movement,
    Reformer,
}

impl Room {
    pub const ALL: [Room; 2] = [Room::Movement, Room::Reformer];

    pub fn code(&self) -> &'static str {
        match self {
            Room::Movement => "movement",
            Room::Reformer => "reformer",
        }
    }

    /// Convert input code from CLI or storage (any case)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "movement" | "m" => Some(Room::Movement),
            "reformer" | "r" => Some(Room::Reformer),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Room::Movement => "Movement Room",
            Room::Reformer => "Reformer Room",
        }
    }

    /// Local storage key for one entity kind, e.g. `movementTeachers`.
    pub fn storage_key(&self, kind: &str) -> String {
        format!("{}{}", self.code(), kind)
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
