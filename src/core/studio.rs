//! Application context: grid, occupancy rules, per-room state and the
//! persistence gateway, plus every operator action.
//!
//! Mutations follow one pattern: validate, apply in memory, persist through
//! the gateway, and restore the in-memory snapshot if persistence fails. The
//! caller therefore sees either the whole change or none of it.
//!
//! Concurrent editors are not coordinated: the last write wins, and
//! `reload` replaces in-memory state wholesale.

use crate::config::Config;
use crate::core::catalog::Catalog;
use crate::core::grid::TimeGrid;
use crate::core::occupancy::{Occupancy, OccupancyEngine};
use crate::core::schedule::{DaySchedule, PutOutcome, RoomSchedule, ScheduleStore};
use crate::core::stats::{self, UsageStats};
use crate::errors::{AppError, AppResult};
use crate::models::class_entry::{ClassEntry, DEFAULT_SESSION_TYPE};
use crate::models::day::Day;
use crate::models::room::Room;
use crate::models::time_slot::TimeSlot;
use crate::persistence::gateway::PersistenceGateway;
use crate::persistence::{EntryChange, GatewayMode, RoomState};
use crate::utils::date;
use chrono::NaiveDate;
use std::collections::BTreeMap;

static EMPTY_DAY: DaySchedule = DaySchedule::new();

/// What to do with a deleted teacher's classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeacherRemoval {
    DeleteClasses,
    ReassignTo(String),
}

/// Operator input for creating or editing a class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRequest {
    pub class_name: String,
    pub teacher_name: String,
    pub level: Option<String>,
    pub session_type: Option<String>,
    pub duration_minutes: Option<u32>,
    pub start_date: Option<NaiveDate>,
}

impl ClassRequest {
    pub fn new(class_name: &str, teacher_name: &str) -> Self {
        Self {
            class_name: class_name.trim().to_string(),
            teacher_name: teacher_name.trim().to_string(),
            ..Self::default()
        }
    }

    pub fn level(mut self, level: &str) -> Self {
        self.level = Some(level.to_string());
        self
    }

    pub fn session_type(mut self, session_type: &str) -> Self {
        self.session_type = Some(session_type.to_string());
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }
}

#[derive(Debug, Clone)]
struct RoomData {
    catalog: Catalog,
    store: ScheduleStore,
}

impl RoomData {
    fn empty(room: Room) -> Self {
        Self {
            catalog: Catalog::default(),
            store: ScheduleStore::new(room),
        }
    }

    fn state(&self) -> RoomState<'_> {
        RoomState {
            room: self.store.room(),
            catalog: &self.catalog,
            schedule: self.store.schedule(),
        }
    }
}

pub struct Studio {
    grid: TimeGrid,
    engine: OccupancyEngine,
    max_duration: u32,
    default_duration: u32,
    default_level: String,
    rooms: BTreeMap<Room, RoomData>,
    gateway: PersistenceGateway,
    today: Option<NaiveDate>,
}

impl Studio {
    /// Build the context and load every room through the gateway.
    pub fn open(cfg: &Config, gateway: PersistenceGateway) -> AppResult<Self> {
        cfg.validate()?;
        let mut studio = Self {
            grid: TimeGrid::new(cfg.start_hour, cfg.end_hour)?,
            engine: OccupancyEngine::new(cfg.max_duration),
            max_duration: cfg.max_duration,
            default_duration: cfg.default_duration,
            default_level: cfg.default_level.clone(),
            rooms: BTreeMap::new(),
            gateway,
            today: None,
        };
        studio.reload()?;
        Ok(studio)
    }

    /// Pin "today" for active/inactive decisions.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(date::today)
    }

    /// Re-fetch rosters, catalogs and schedules of both rooms.
    ///
    /// A fallback partway through starts the fetch over, so every room comes
    /// from local storage rather than a mix of remote and local data.
    pub fn reload(&mut self) -> AppResult<()> {
        let was_remote = self.gateway.is_remote();
        let mut rooms = self.fetch_rooms()?;
        if was_remote && !self.gateway.is_remote() {
            rooms = self.fetch_rooms()?;
        }
        self.rooms = rooms;
        Ok(())
    }

    fn fetch_rooms(&mut self) -> AppResult<BTreeMap<Room, RoomData>> {
        let mut rooms = BTreeMap::new();
        for room in Room::ALL {
            let teachers = self.gateway.load_teachers(room)?;
            let classes = self.gateway.load_class_types(room)?;
            let schedule = self.gateway.load_schedule(room)?;
            rooms.insert(
                room,
                RoomData {
                    catalog: Catalog::from_parts(&teachers, &classes),
                    store: ScheduleStore::with_schedule(room, schedule),
                },
            );
        }
        Ok(rooms)
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn engine(&self) -> &OccupancyEngine {
        &self.engine
    }

    pub fn gateway_mode(&self) -> GatewayMode {
        self.gateway.mode()
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut PersistenceGateway {
        &mut self.gateway
    }

    pub fn catalog(&self, room: Room) -> Option<&Catalog> {
        self.rooms.get(&room).map(|r| &r.catalog)
    }

    pub fn schedule(&self, room: Room) -> Option<&RoomSchedule> {
        self.rooms.get(&room).map(|r| r.store.schedule())
    }

    pub fn entry(&self, room: Room, day: Day, slot: TimeSlot) -> Option<&ClassEntry> {
        self.rooms.get(&room).and_then(|r| r.store.get(day, slot))
    }

    fn day_of(&self, room: Room, day: Day) -> &DaySchedule {
        self.rooms
            .get(&room)
            .and_then(|r| r.store.day(day))
            .unwrap_or(&EMPTY_DAY)
    }

    pub fn classify(&self, room: Room, day: Day, slot: TimeSlot) -> Occupancy<'_> {
        self.engine.classify(self.day_of(room, day), slot, &self.grid)
    }

    /// Occupancy as rendered today: inactive entries show as free.
    pub fn classify_active(&self, room: Room, day: Day, slot: TimeSlot) -> Occupancy<'_> {
        self.engine
            .classify_active(self.day_of(room, day), slot, &self.grid, self.today())
    }

    /// Statistics for one room, or the whole studio with `None`.
    pub fn stats(&self, scope: Option<Room>) -> UsageStats {
        stats::compute(
            self.rooms
                .iter()
                .filter(|(room, _)| scope.is_none_or(|s| s == **room))
                .map(|(room, data)| (*room, data.store.schedule())),
        )
    }

    pub fn teacher_class_count(&self, room: Room, teacher: &str) -> usize {
        self.schedule(room)
            .map(|s| s.entries().filter(|(_, _, e)| e.teacher_name == teacher).count())
            .unwrap_or(0)
    }

    pub fn class_type_count(&self, room: Room, class_name: &str) -> usize {
        self.schedule(room)
            .map(|s| s.entries().filter(|(_, _, e)| e.class_name == class_name).count())
            .unwrap_or(0)
    }

    fn build_entry(&self, catalog: &Catalog, request: &ClassRequest) -> AppResult<ClassEntry> {
        if request.class_name.trim().is_empty() {
            return Err(AppError::Validation("a class is required".into()));
        }
        if request.teacher_name.trim().is_empty() {
            return Err(AppError::Validation("a teacher is required".into()));
        }
        if !catalog.has_teacher(&request.teacher_name) {
            return Err(AppError::Validation(format!(
                "teacher '{}' is not on this room's roster",
                request.teacher_name
            )));
        }
        let Some(class_level) = catalog.default_level(&request.class_name) else {
            return Err(AppError::Validation(format!(
                "class type '{}' is not in this room's catalog",
                request.class_name
            )));
        };

        let level = request
            .level
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(class_level);
        let session_type = request
            .session_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SESSION_TYPE);

        let entry = ClassEntry::new(&request.class_name, &request.teacher_name)
            .with_level(level)
            .with_session_type(session_type)
            .with_duration(request.duration_minutes.unwrap_or(self.default_duration))
            .with_start_date(request.start_date);
        entry.validate(self.max_duration)?;
        Ok(entry)
    }

    /// Add a class at an empty slot or edit the one keyed there.
    pub fn save_class(
        &mut self,
        room: Room,
        day: Day,
        slot: TimeSlot,
        request: &ClassRequest,
    ) -> AppResult<PutOutcome> {
        let catalog = self
            .rooms
            .get(&room)
            .map(|r| r.catalog.clone())
            .unwrap_or_default();
        let entry = self.build_entry(&catalog, request)?;

        let data = self
            .rooms
            .entry(room)
            .or_insert_with(|| RoomData::empty(room));
        let snapshot = data.store.clone();

        let outcome = data.store.put(&self.engine, &self.grid, day, slot, entry.clone())?;

        if let Err(e) = self.gateway.put_entry(day, slot, &entry, data.state()) {
            data.store = snapshot;
            return Err(e);
        }
        Ok(outcome)
    }

    pub fn remove_class(&mut self, room: Room, day: Day, slot: TimeSlot) -> AppResult<ClassEntry> {
        let data = self
            .rooms
            .entry(room)
            .or_insert_with(|| RoomData::empty(room));
        let snapshot = data.store.clone();

        let removed = data.store.remove(day, slot)?;

        if let Err(e) = self.gateway.delete_entry(day, slot, data.state()) {
            data.store = snapshot;
            return Err(e);
        }
        Ok(removed)
    }

    pub fn add_teacher(&mut self, room: Room, name: &str) -> AppResult<String> {
        let data = self
            .rooms
            .entry(room)
            .or_insert_with(|| RoomData::empty(room));
        let snapshot = data.catalog.clone();

        let name = data.catalog.add_teacher(name)?;

        if let Err(e) = self.gateway.add_teacher(&name, data.state()) {
            data.catalog = snapshot;
            return Err(e);
        }
        self.gateway
            .log("teacher_add", room.code(), &format!("Added teacher '{}'", name));
        Ok(name)
    }

    /// Rename on the roster and in every entry. Returns entries updated.
    pub fn rename_teacher(&mut self, room: Room, old: &str, new: &str) -> AppResult<usize> {
        let data = self
            .rooms
            .entry(room)
            .or_insert_with(|| RoomData::empty(room));
        let snapshot = data.clone();

        let new = data.catalog.rename_teacher(old, new)?;
        let changed = data.store.rename_teacher(old, &new);

        if let Err(e) = self.gateway.rename_teacher(old, &new, data.state()) {
            *data = snapshot;
            return Err(e);
        }
        self.gateway.log(
            "teacher_rename",
            room.code(),
            &format!("Renamed teacher '{}' to '{}' ({} classes)", old, new, changed),
        );
        Ok(changed)
    }

    /// Remove a teacher, deleting or reassigning their classes.
    /// Returns how many entries were deleted or reassigned.
    pub fn delete_teacher(
        &mut self,
        room: Room,
        name: &str,
        removal: &TeacherRemoval,
    ) -> AppResult<usize> {
        let data = self
            .rooms
            .entry(room)
            .or_insert_with(|| RoomData::empty(room));
        if !data.catalog.has_teacher(name) {
            return Err(AppError::NotFound(format!("teacher '{}'", name)));
        }
        if let TeacherRemoval::ReassignTo(replacement) = removal {
            if replacement == name {
                return Err(AppError::Validation(
                    "the replacement teacher must differ from the one being deleted".into(),
                ));
            }
            if !data.catalog.has_teacher(replacement) {
                return Err(AppError::Validation(format!(
                    "replacement teacher '{}' is not on this room's roster",
                    replacement
                )));
            }
        }

        let snapshot = data.clone();

        let cascade: Vec<EntryChange> = match removal {
            TeacherRemoval::DeleteClasses => data
                .store
                .remove_by_teacher(name)
                .into_iter()
                .map(|(day, slot)| EntryChange::Removed { day, slot })
                .collect(),
            TeacherRemoval::ReassignTo(replacement) => {
                let moved: Vec<(Day, TimeSlot)> = data
                    .store
                    .schedule()
                    .entries()
                    .filter(|(_, _, e)| e.teacher_name == name)
                    .map(|(day, slot, _)| (day, slot))
                    .collect();
                data.store.reassign_teacher(name, replacement);
                moved
                    .into_iter()
                    .filter_map(|(day, slot)| {
                        data.store.get(day, slot).map(|entry| EntryChange::Put {
                            day,
                            slot,
                            entry: entry.clone(),
                        })
                    })
                    .collect()
            }
        };
        data.catalog.remove_teacher(name)?;

        if let Err(e) = self.gateway.delete_teacher(name, &cascade, data.state()) {
            *data = snapshot;
            return Err(e);
        }
        self.gateway.log(
            "teacher_delete",
            room.code(),
            &format!("Deleted teacher '{}' ({} classes affected)", name, cascade.len()),
        );
        Ok(cascade.len())
    }

    /// Add a class type; `level` falls back to the configured default level.
    pub fn add_class_type(&mut self, room: Room, name: &str, level: Option<&str>) -> AppResult<String> {
        let level = level
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.default_level.as_str())
            .to_string();
        let data = self
            .rooms
            .entry(room)
            .or_insert_with(|| RoomData::empty(room));
        let snapshot = data.catalog.clone();

        let name = data.catalog.add_class(name, &level)?;

        if let Err(e) = self.gateway.add_class_type(&name, &level, data.state()) {
            data.catalog = snapshot;
            return Err(e);
        }
        self.gateway.log(
            "class_add",
            room.code(),
            &format!("Added class type '{}' ({})", name, level),
        );
        Ok(name)
    }

    /// Rename in the catalog and in every entry. Returns entries updated.
    pub fn rename_class_type(&mut self, room: Room, old: &str, new: &str) -> AppResult<usize> {
        let data = self
            .rooms
            .entry(room)
            .or_insert_with(|| RoomData::empty(room));
        let snapshot = data.clone();

        let new = data.catalog.rename_class(old, new)?;
        let changed = data.store.rename_class(old, &new);

        if let Err(e) = self.gateway.rename_class_type(old, &new, data.state()) {
            *data = snapshot;
            return Err(e);
        }
        self.gateway.log(
            "class_rename",
            room.code(),
            &format!("Renamed class type '{}' to '{}' ({} classes)", old, new, changed),
        );
        Ok(changed)
    }

    /// Remove a class type and every entry using it. Returns entries deleted.
    pub fn delete_class_type(&mut self, room: Room, name: &str) -> AppResult<usize> {
        let data = self
            .rooms
            .entry(room)
            .or_insert_with(|| RoomData::empty(room));
        let snapshot = data.clone();

        data.catalog.remove_class(name)?;
        let cascade: Vec<EntryChange> = data
            .store
            .remove_by_class(name)
            .into_iter()
            .map(|(day, slot)| EntryChange::Removed { day, slot })
            .collect();

        if let Err(e) = self.gateway.delete_class_type(name, &cascade, data.state()) {
            *data = snapshot;
            return Err(e);
        }
        self.gateway.log(
            "class_delete",
            room.code(),
            &format!("Deleted class type '{}' ({} classes removed)", name, cascade.len()),
        );
        Ok(cascade.len())
    }
}
