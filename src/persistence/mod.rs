//! Durable storage behind the studio: a local key/value store that always
//! works and an optional remote backend tried first.

pub mod gateway;
pub mod local;
pub mod memory;
pub mod remote;
pub mod rest;

use crate::core::catalog::Catalog;
use crate::core::schedule::RoomSchedule;
use crate::errors::AppResult;
use crate::models::class_entry::ClassEntry;
use crate::models::class_type::ClassType;
use crate::models::day::Day;
use crate::models::room::Room;
use crate::models::teacher::Teacher;
use crate::models::time_slot::TimeSlot;
use std::fmt;

/// Marker written once local data has been pushed to the remote backend.
pub const MIGRATION_MARKER_KEY: &str = "remote_migration_complete";

/// String-keyed durable storage (JSON blobs), plus the internal log.
pub trait LocalStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
    /// Write every pair or none of them.
    fn set_many(&mut self, pairs: &[(String, String)]) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
    fn log(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()>;
}

/// Which backend the gateway currently routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    Remote,
    Local,
}

impl fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayMode::Remote => f.write_str("remote"),
            GatewayMode::Local => f.write_str("local"),
        }
    }
}

/// Room state after a mutation has been applied in memory.
///
/// Blob-oriented backends rewrite the affected keys from it; per-entity
/// backends use the explicit operation arguments instead.
#[derive(Debug, Clone, Copy)]
pub struct RoomState<'a> {
    pub room: Room,
    pub catalog: &'a Catalog,
    pub schedule: &'a RoomSchedule,
}

/// One schedule entry touched by a cascading settings change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryChange {
    Put {
        day: Day,
        slot: TimeSlot,
        entry: ClassEntry,
    },
    Removed {
        day: Day,
        slot: TimeSlot,
    },
}

/// Logical data operations shared by the local and remote backends.
pub trait PersistenceBackend {
    fn mode(&self) -> GatewayMode;

    fn load_teachers(&mut self, room: Room) -> AppResult<Vec<Teacher>>;
    fn load_class_types(&mut self, room: Room) -> AppResult<Vec<ClassType>>;
    fn load_schedule(&mut self, room: Room) -> AppResult<RoomSchedule>;

    fn add_teacher(&mut self, name: &str, state: RoomState<'_>) -> AppResult<()>;
    fn rename_teacher(&mut self, old: &str, new: &str, state: RoomState<'_>) -> AppResult<()>;
    fn delete_teacher(
        &mut self,
        name: &str,
        cascade: &[EntryChange],
        state: RoomState<'_>,
    ) -> AppResult<()>;

    fn add_class_type(&mut self, name: &str, level: &str, state: RoomState<'_>) -> AppResult<()>;
    fn rename_class_type(&mut self, old: &str, new: &str, state: RoomState<'_>)
    -> AppResult<()>;
    fn delete_class_type(
        &mut self,
        name: &str,
        cascade: &[EntryChange],
        state: RoomState<'_>,
    ) -> AppResult<()>;

    fn put_entry(
        &mut self,
        day: Day,
        slot: TimeSlot,
        entry: &ClassEntry,
        state: RoomState<'_>,
    ) -> AppResult<()>;
    fn delete_entry(&mut self, day: Day, slot: TimeSlot, state: RoomState<'_>) -> AppResult<()>;
}
