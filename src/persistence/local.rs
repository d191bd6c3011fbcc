//! Local backend: one JSON blob per room and kind.
//!
//! * `<room>Teachers`    → `["Ana", "Ben"]`
//! * `<room>ClassesData` → `{"Flow": "Beginner"}`
//! * `<room>Schedule`    → `{"Monday": {"9:00 AM": {"class": ..., "teacher": ...}}}`
//!
//! Reads are forgiving: unknown days, bad slot labels and entries without a
//! class or teacher are dropped, so a hand-edited blob never poisons a load.
//!
//! Every write stores all three blobs of the room in one transaction, so
//! local storage always mirrors the in-memory room, including state that
//! was loaded from the remote backend before a fallback.

use super::{EntryChange, GatewayMode, LocalStorage, PersistenceBackend, RoomState};
use crate::core::schedule::{DaySchedule, RoomSchedule};
use crate::errors::AppResult;
use crate::models::class_entry::{ClassEntry, DEFAULT_DURATION, DEFAULT_SESSION_TYPE};
use crate::models::class_type::{ClassType, DEFAULT_LEVEL};
use crate::models::day::Day;
use crate::models::room::Room;
use crate::models::teacher::Teacher;
use crate::models::time_slot::TimeSlot;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const TEACHERS_KIND: &str = "Teachers";
pub const CLASSES_KIND: &str = "ClassesData";
pub const SCHEDULE_KIND: &str = "Schedule";

/// Lenient shape of a stored entry; normalized into `ClassEntry`.
#[derive(Debug, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    teacher: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(rename = "type", default)]
    session_type: Option<String>,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(rename = "startDate", default)]
    start_date: Option<String>,
}

impl StoredEntry {
    /// `levels` maps class type → default level, used when no level was stored.
    fn into_entry(self, levels: &BTreeMap<String, String>) -> Option<ClassEntry> {
        let class = self.class.filter(|c| !c.trim().is_empty())?;
        let teacher = self.teacher.filter(|t| !t.trim().is_empty())?;

        let start_date = self
            .start_date
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

        let level = match self.level.filter(|l| !l.trim().is_empty()) {
            Some(level) => level,
            None => levels
                .get(&class)
                .cloned()
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
        };

        Some(
            ClassEntry::new(&class, &teacher)
                .with_level(&level)
                .with_session_type(
                    self.session_type
                        .as_deref()
                        .filter(|t| !t.is_empty())
                        .unwrap_or(DEFAULT_SESSION_TYPE),
                )
                .with_duration(self.duration.filter(|d| *d > 0).unwrap_or(DEFAULT_DURATION))
                .with_start_date(start_date),
        )
    }
}

pub struct LocalBackend {
    storage: Box<dyn LocalStorage>,
}

impl LocalBackend {
    pub fn new(storage: Box<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &dyn LocalStorage {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn LocalStorage {
        self.storage.as_mut()
    }

    fn read_json(&self, key: &str) -> AppResult<Option<Value>> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warning(format!("Ignoring unreadable local data under '{}': {}", key, e));
                Ok(None)
            }
        }
    }

    /// Write `teachers` and `classes` for `room` under whichever of the two
    /// keys is absent. Returns whether anything was written.
    pub fn seed_room(
        &mut self,
        room: Room,
        teachers: &[&str],
        classes: &[(&str, &str)],
    ) -> AppResult<bool> {
        let mut pairs = Vec::new();

        let teachers_key = room.storage_key(TEACHERS_KIND);
        if self.storage.get(&teachers_key)?.is_none() {
            let mut names: Vec<&str> = teachers.to_vec();
            names.sort_unstable();
            pairs.push((teachers_key, serde_json::to_string(&names)?));
        }

        let classes_key = room.storage_key(CLASSES_KIND);
        if self.storage.get(&classes_key)?.is_none() {
            let levels: BTreeMap<&str, &str> = classes.iter().copied().collect();
            pairs.push((classes_key, serde_json::to_string(&levels)?));
        }

        if pairs.is_empty() {
            return Ok(false);
        }
        self.storage.set_many(&pairs)?;
        Ok(true)
    }

    pub fn has_schedule_data(&self) -> AppResult<bool> {
        for room in Room::ALL {
            if !self.load_schedule_blob(room)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn load_schedule_blob(&self, room: Room) -> AppResult<RoomSchedule> {
        let key = room.storage_key(SCHEDULE_KIND);
        let Some(Value::Object(days)) = self.read_json(&key)? else {
            return Ok(RoomSchedule::default());
        };

        let levels: BTreeMap<String, String> = self
            .class_types_blob(room)?
            .into_iter()
            .map(|c| (c.name, c.default_level))
            .collect();

        let mut out: BTreeMap<Day, DaySchedule> = BTreeMap::new();
        for (day_name, slots) in days {
            let Some(day) = Day::from_name(&day_name) else {
                warning(format!("{}: dropping unknown day '{}'", key, day_name));
                continue;
            };
            let Value::Object(slots) = slots else {
                continue;
            };
            for (label, raw) in slots {
                let Some(slot) = TimeSlot::parse(&label) else {
                    warning(format!("{}: dropping unreadable slot '{}' on {}", key, label, day));
                    continue;
                };
                let entry = serde_json::from_value::<StoredEntry>(raw)
                    .ok()
                    .and_then(|stored| stored.into_entry(&levels));
                match entry {
                    Some(entry) => {
                        out.entry(day).or_default().insert(slot, entry);
                    }
                    None => warning(format!(
                        "{}: dropping incomplete entry at {} on {}",
                        key, label, day
                    )),
                }
            }
        }
        Ok(RoomSchedule::from_days(out))
    }

    fn class_types_blob(&self, room: Room) -> AppResult<Vec<ClassType>> {
        let Some(Value::Object(classes)) = self.read_json(&room.storage_key(CLASSES_KIND))? else {
            return Ok(Vec::new());
        };
        Ok(classes
            .iter()
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, level)| ClassType::new(name, room, level.as_str().unwrap_or_default()))
            .collect())
    }

    fn teachers_blob(state: RoomState<'_>) -> AppResult<(String, String)> {
        Ok((
            state.room.storage_key(TEACHERS_KIND),
            serde_json::to_string(state.catalog.teachers())?,
        ))
    }

    fn classes_blob(state: RoomState<'_>) -> AppResult<(String, String)> {
        Ok((
            state.room.storage_key(CLASSES_KIND),
            serde_json::to_string(state.catalog.classes())?,
        ))
    }

    fn schedule_blob(state: RoomState<'_>) -> AppResult<(String, String)> {
        let mut days = Map::new();
        for (day, slots) in state.schedule.days() {
            let mut by_label = Map::new();
            for (slot, entry) in slots {
                by_label.insert(slot.label(), serde_json::to_value(entry)?);
            }
            days.insert(day.name().to_string(), Value::Object(by_label));
        }
        Ok((
            state.room.storage_key(SCHEDULE_KIND),
            Value::Object(days).to_string(),
        ))
    }

    /// Roster, catalog and schedule of the room in a single `set_many`.
    fn write_room(&mut self, state: RoomState<'_>) -> AppResult<()> {
        let pairs = vec![
            Self::teachers_blob(state)?,
            Self::classes_blob(state)?,
            Self::schedule_blob(state)?,
        ];
        self.storage.set_many(&pairs)
    }
}

impl PersistenceBackend for LocalBackend {
    fn mode(&self) -> GatewayMode {
        GatewayMode::Local
    }

    fn load_teachers(&mut self, room: Room) -> AppResult<Vec<Teacher>> {
        let Some(Value::Array(names)) = self.read_json(&room.storage_key(TEACHERS_KIND))? else {
            return Ok(Vec::new());
        };
        let mut teachers: Vec<Teacher> = names
            .iter()
            .filter_map(Value::as_str)
            .map(|n| Teacher::new(n, room))
            .filter(|t| !t.name.is_empty())
            .collect();
        teachers.sort_by(|a, b| a.name.cmp(&b.name));
        teachers.dedup_by(|a, b| a.name == b.name);
        Ok(teachers)
    }

    fn load_class_types(&mut self, room: Room) -> AppResult<Vec<ClassType>> {
        self.class_types_blob(room)
    }

    fn load_schedule(&mut self, room: Room) -> AppResult<RoomSchedule> {
        self.load_schedule_blob(room)
    }

    fn add_teacher(&mut self, _name: &str, state: RoomState<'_>) -> AppResult<()> {
        self.write_room(state)
    }

    fn rename_teacher(&mut self, _old: &str, _new: &str, state: RoomState<'_>) -> AppResult<()> {
        self.write_room(state)
    }

    fn delete_teacher(
        &mut self,
        _name: &str,
        _cascade: &[EntryChange],
        state: RoomState<'_>,
    ) -> AppResult<()> {
        self.write_room(state)
    }

    fn add_class_type(&mut self, _name: &str, _level: &str, state: RoomState<'_>) -> AppResult<()> {
        self.write_room(state)
    }

    fn rename_class_type(
        &mut self,
        _old: &str,
        _new: &str,
        state: RoomState<'_>,
    ) -> AppResult<()> {
        self.write_room(state)
    }

    fn delete_class_type(
        &mut self,
        _name: &str,
        _cascade: &[EntryChange],
        state: RoomState<'_>,
    ) -> AppResult<()> {
        self.write_room(state)
    }

    fn put_entry(
        &mut self,
        _day: Day,
        _slot: TimeSlot,
        _entry: &ClassEntry,
        state: RoomState<'_>,
    ) -> AppResult<()> {
        self.write_room(state)
    }

    fn delete_entry(&mut self, _day: Day, _slot: TimeSlot, state: RoomState<'_>) -> AppResult<()> {
        self.write_room(state)
    }
}
