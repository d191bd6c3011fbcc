//! Starter rosters and class catalogs written by `init` on a fresh database.

use crate::errors::AppResult;
use crate::models::room::Room;
use crate::persistence::local::LocalBackend;

const MOVEMENT_TEACHERS: &[&str] = &["Ann", "Zeena", "Haya", "Vicktoria", "Natalie"];

const MOVEMENT_CLASSES: &[(&str, &str)] = &[
    ("Barre Skulpt", "Intermediate"),
    ("Skulpt X Strength", "Intermediate"),
    ("Skulpt Ground", "Intermediate"),
    ("Mobility: Strength X Flexibility", "Beginner"),
    ("Hatha Yoga - Sun", "Intermediate"),
    ("Hatha Yoga - Moon", "Beginner"),
    ("Yin Yoga", "Beginner"),
    ("SKULPT X Mama", "Beginner"),
    ("Teens X Skulpt Ground", "Teens"),
];

const REFORMER_TEACHERS: &[&str] = &[
    "Natalie", "Tina", "Sara A", "Rebecca", "Nour", "Nadeen H", "Nadeen S", "Deena",
];

const REFORMER_CLASSES: &[(&str, &str)] = &[
    ("Strong Start (Beginner)", "Beginner"),
    ("Skulpt & Tone (Intermediate)", "Intermediate"),
    ("Skulpt Vertical: Tower", "Advanced"),
    ("Chair & Tower", "Intermediate"),
    ("Cardio Skulpt Reformer", "Advanced"),
    ("Skulpt BarreFormer", "Intermediate"),
    ("Reformer for Active Aging", "Beginner"),
    ("Strong Mama Reformer", "Beginner"),
    ("Teen SKULPT Reformer", "Teens"),
    ("SKULPT Core X Booty Reformer", "Advanced"),
];

pub fn teachers(room: Room) -> &'static [&'static str] {
    match room {
        Room::Movement => MOVEMENT_TEACHERS,
        Room::Reformer => REFORMER_TEACHERS,
    }
}

/// Class type → default level.
pub fn classes(room: Room) -> &'static [(&'static str, &'static str)] {
    match room {
        Room::Movement => MOVEMENT_CLASSES,
        Room::Reformer => REFORMER_CLASSES,
    }
}

/// Write the starter roster and catalog of every room whose blobs are
/// still absent. Existing data is never touched. Returns the rooms seeded.
pub fn seed_missing(local: &mut LocalBackend) -> AppResult<Vec<Room>> {
    let mut seeded = Vec::new();
    for room in Room::ALL {
        if local.seed_room(room, teachers(room), classes(room))? {
            seeded.push(room);
        }
    }
    if !seeded.is_empty() {
        let names: Vec<&str> = seeded.iter().map(|r| r.code()).collect();
        local.storage_mut().log(
            "seed_defaults",
            &names.join(","),
            "Wrote starter teachers and class types",
        )?;
    }
    Ok(seeded)
}
