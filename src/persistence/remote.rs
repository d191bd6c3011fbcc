//! Remote backend: per-entity writes against a relational store where
//! schedule rows reference teachers and class types by id.

use super::{EntryChange, GatewayMode, PersistenceBackend, RoomState};
use crate::core::schedule::{DaySchedule, RoomSchedule};
use crate::errors::{AppError, AppResult};
use crate::models::class_entry::{ClassEntry, DEFAULT_DURATION};
use crate::models::class_type::ClassType;
use crate::models::day::Day;
use crate::models::room::Room;
use crate::models::teacher::Teacher;
use crate::models::time_slot::TimeSlot;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("invalid remote data: {0}")]
    Validation(String),

    #[error("not supported by this remote: {0}")]
    Unsupported(String),
}

impl From<RemoteError> for AppError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Validation(msg) => AppError::Validation(msg),
            other => AppError::RemoteUnavailable(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub id: i64,
    pub name: String,
    pub room: Room,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTypeRecord {
    pub id: i64,
    pub name: String,
    pub room: Room,
    #[serde(default)]
    pub level: Option<String>,
}

/// Row of `schedule_entries`; unique on `(day, time, room)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub day: String,
    pub time: String,
    pub room: Room,
    pub class_id: i64,
    pub teacher_id: i64,
    #[serde(rename = "type", default)]
    pub session_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration: Option<u32>,
}

/// Remote tables that can be watched for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Schedule,
    Teachers,
    ClassTypes,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Schedule,
        Collection::Teachers,
        Collection::ClassTypes,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Collection::Schedule => "schedule_entries",
            Collection::Teachers => "teachers",
            Collection::ClassTypes => "class_types",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Zero-argument change callback; may run on the remote client's thread.
pub type ChangeHandler = Arc<dyn Fn() + Send + Sync>;

/// Live change subscription. Dropping it cancels the subscription.
pub struct Subscription {
    collection: Collection,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(collection: Collection, cancel: Option<Box<dyn FnOnce() + Send>>) -> Self {
        Self { collection, cancel }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("collection", &self.collection)
            .finish()
    }
}

/// Narrow CRUD + subscribe surface of the remote relational store.
pub trait RemoteStore: Send + Sync {
    fn list_teachers(&self, room: Option<Room>) -> Result<Vec<TeacherRecord>, RemoteError>;
    fn list_class_types(&self, room: Option<Room>) -> Result<Vec<ClassTypeRecord>, RemoteError>;
    fn list_schedule(&self, room: Option<Room>) -> Result<Vec<ScheduleRecord>, RemoteError>;

    fn insert_teacher(&self, name: &str, room: Room) -> Result<TeacherRecord, RemoteError>;
    fn insert_class_type(
        &self,
        name: &str,
        room: Room,
        level: &str,
    ) -> Result<ClassTypeRecord, RemoteError>;

    fn update_teacher_name(&self, id: i64, name: &str) -> Result<(), RemoteError>;
    fn update_class_type_name(&self, id: i64, name: &str) -> Result<(), RemoteError>;

    fn delete_teacher(&self, id: i64) -> Result<(), RemoteError>;
    fn delete_class_type(&self, id: i64) -> Result<(), RemoteError>;

    /// Insert or overwrite the row keyed by `(day, time, room)`.
    fn upsert_schedule(&self, record: &ScheduleRecord) -> Result<(), RemoteError>;
    fn delete_schedule(&self, day: &str, time: &str, room: Room) -> Result<(), RemoteError>;

    fn subscribe(
        &self,
        collection: Collection,
        handler: ChangeHandler,
    ) -> Result<Subscription, RemoteError>;
}

pub struct RemoteBackend {
    store: Arc<dyn RemoteStore>,
}

impl RemoteBackend {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn RemoteStore> {
        Arc::clone(&self.store)
    }

    fn teacher_id(&self, room: Room, name: &str) -> AppResult<i64> {
        self.store
            .list_teachers(Some(room))?
            .into_iter()
            .find(|t| t.name == name)
            .map(|t| t.id)
            .ok_or_else(|| {
                AppError::Validation(format!("teacher '{}' is unknown to the remote store", name))
            })
    }

    fn class_type_id(&self, room: Room, name: &str) -> AppResult<i64> {
        self.store
            .list_class_types(Some(room))?
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "class type '{}' is unknown to the remote store",
                    name
                ))
            })
    }

    /// Resolve names to ids and build the row for `(day, slot, room)`.
    pub fn record_for(
        &self,
        room: Room,
        day: Day,
        slot: TimeSlot,
        entry: &ClassEntry,
    ) -> AppResult<ScheduleRecord> {
        Ok(ScheduleRecord {
            id: None,
            day: day.name().to_string(),
            time: slot.label(),
            room,
            class_id: self.class_type_id(room, &entry.class_name)?,
            teacher_id: self.teacher_id(room, &entry.teacher_name)?,
            session_type: Some(entry.session_type.clone()),
            start_date: entry.start_date,
            duration: Some(entry.duration_minutes),
        })
    }

    fn apply_cascade(&self, room: Room, cascade: &[EntryChange]) -> AppResult<()> {
        for change in cascade {
            match change {
                EntryChange::Put { day, slot, entry } => {
                    let record = self.record_for(room, *day, *slot, entry)?;
                    self.store.upsert_schedule(&record)?;
                }
                EntryChange::Removed { day, slot } => {
                    self.store.delete_schedule(day.name(), &slot.label(), room)?;
                }
            }
        }
        Ok(())
    }
}

impl PersistenceBackend for RemoteBackend {
    fn mode(&self) -> GatewayMode {
        GatewayMode::Remote
    }

    fn load_teachers(&mut self, room: Room) -> AppResult<Vec<Teacher>> {
        let mut teachers: Vec<Teacher> = self
            .store
            .list_teachers(Some(room))?
            .iter()
            .map(|r| Teacher::new(&r.name, room))
            .collect();
        teachers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teachers)
    }

    fn load_class_types(&mut self, room: Room) -> AppResult<Vec<ClassType>> {
        Ok(self
            .store
            .list_class_types(Some(room))?
            .iter()
            .map(|r| ClassType::new(&r.name, room, r.level.as_deref().unwrap_or_default()))
            .collect())
    }

    fn load_schedule(&mut self, room: Room) -> AppResult<RoomSchedule> {
        let teachers: HashMap<i64, String> = self
            .store
            .list_teachers(Some(room))?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        let classes: HashMap<i64, ClassType> = self
            .store
            .list_class_types(Some(room))?
            .into_iter()
            .map(|c| {
                let level = c.level.unwrap_or_default();
                (c.id, ClassType::new(&c.name, room, &level))
            })
            .collect();

        let mut days: BTreeMap<Day, DaySchedule> = BTreeMap::new();
        for record in self.store.list_schedule(Some(room))? {
            let (Some(day), Some(slot)) = (Day::from_name(&record.day), TimeSlot::parse(&record.time))
            else {
                warning(format!(
                    "Skipping remote entry with bad position '{} {}'",
                    record.day, record.time
                ));
                continue;
            };
            let (Some(class), Some(teacher)) =
                (classes.get(&record.class_id), teachers.get(&record.teacher_id))
            else {
                warning(format!(
                    "Skipping remote entry at {} on {}: dangling class or teacher reference",
                    slot, day
                ));
                continue;
            };

            let mut entry = ClassEntry::new(&class.name, teacher)
                .with_level(&class.default_level)
                .with_duration(record.duration.filter(|d| *d > 0).unwrap_or(DEFAULT_DURATION))
                .with_start_date(record.start_date);
            if let Some(t) = record.session_type.as_deref().filter(|t| !t.is_empty()) {
                entry = entry.with_session_type(t);
            }

            days.entry(day).or_default().insert(slot, entry);
        }
        Ok(RoomSchedule::from_days(days))
    }

    fn add_teacher(&mut self, name: &str, state: RoomState<'_>) -> AppResult<()> {
        self.store.insert_teacher(name, state.room)?;
        Ok(())
    }

    fn rename_teacher(&mut self, old: &str, new: &str, state: RoomState<'_>) -> AppResult<()> {
        let id = self.teacher_id(state.room, old)?;
        self.store.update_teacher_name(id, new)?;
        Ok(())
    }

    fn delete_teacher(
        &mut self,
        name: &str,
        cascade: &[EntryChange],
        state: RoomState<'_>,
    ) -> AppResult<()> {
        let id = self.teacher_id(state.room, name)?;
        self.apply_cascade(state.room, cascade)?;
        self.store.delete_teacher(id)?;
        Ok(())
    }

    fn add_class_type(&mut self, name: &str, level: &str, state: RoomState<'_>) -> AppResult<()> {
        self.store.insert_class_type(name, state.room, level)?;
        Ok(())
    }

    fn rename_class_type(&mut self, old: &str, new: &str, state: RoomState<'_>) -> AppResult<()> {
        let id = self.class_type_id(state.room, old)?;
        self.store.update_class_type_name(id, new)?;
        Ok(())
    }

    fn delete_class_type(
        &mut self,
        name: &str,
        cascade: &[EntryChange],
        state: RoomState<'_>,
    ) -> AppResult<()> {
        let id = self.class_type_id(state.room, name)?;
        self.apply_cascade(state.room, cascade)?;
        self.store.delete_class_type(id)?;
        Ok(())
    }

    fn put_entry(
        &mut self,
        day: Day,
        slot: TimeSlot,
        entry: &ClassEntry,
        state: RoomState<'_>,
    ) -> AppResult<()> {
        let record = self.record_for(state.room, day, slot, entry)?;
        self.store.upsert_schedule(&record)?;
        Ok(())
    }

    fn delete_entry(&mut self, day: Day, slot: TimeSlot, state: RoomState<'_>) -> AppResult<()> {
        self.store
            .delete_schedule(day.name(), &slot.label(), state.room)?;
        Ok(())
    }
}
