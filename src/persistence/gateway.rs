//! Remote-first persistence with a one-way fallback to local storage.
//!
//! While in `Remote` mode every operation goes to the remote backend first.
//! The first failure is logged, the gateway drops to `Local` for the rest of
//! its life, and the same operation is replayed locally. Callers only see an
//! error when local storage fails too.

use super::local::LocalBackend;
use super::remote::{RemoteBackend, RemoteStore};
use super::{EntryChange, GatewayMode, LocalStorage, PersistenceBackend, RoomState};
use crate::config::Config;
use crate::core::schedule::RoomSchedule;
use crate::errors::{AppError, AppResult};
use crate::models::class_entry::ClassEntry;
use crate::models::class_type::ClassType;
use crate::models::day::Day;
use crate::models::room::Room;
use crate::models::teacher::Teacher;
use crate::models::time_slot::TimeSlot;
use crate::ui::messages::warning;
use std::sync::Arc;

pub struct PersistenceGateway {
    mode: GatewayMode,
    local: LocalBackend,
    remote: Option<RemoteBackend>,
}

impl PersistenceGateway {
    /// Gateway that never talks to a remote store.
    pub fn local_only(storage: Box<dyn LocalStorage>) -> Self {
        Self {
            mode: GatewayMode::Local,
            local: LocalBackend::new(storage),
            remote: None,
        }
    }

    /// Start in `Remote` mode only when the config asks for it, the
    /// credentials look real and a client was supplied.
    pub fn new(
        cfg: &Config,
        storage: Box<dyn LocalStorage>,
        remote: Option<Arc<dyn RemoteStore>>,
    ) -> Self {
        let mut gateway = Self::local_only(storage);
        if cfg.use_remote && cfg.has_valid_credentials() {
            if let Some(store) = remote {
                gateway.remote = Some(RemoteBackend::new(store));
                gateway.mode = GatewayMode::Remote;
            }
        }
        gateway
    }

    /// Remote-mode gateway over an explicit store, bypassing config checks.
    pub fn with_remote(storage: Box<dyn LocalStorage>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            mode: GatewayMode::Remote,
            local: LocalBackend::new(storage),
            remote: Some(RemoteBackend::new(remote)),
        }
    }

    pub fn mode(&self) -> GatewayMode {
        self.mode
    }

    pub fn is_remote(&self) -> bool {
        self.mode == GatewayMode::Remote
    }

    /// The remote store, only while the gateway is still in `Remote` mode.
    pub fn remote_store(&self) -> Option<Arc<dyn RemoteStore>> {
        match self.mode {
            GatewayMode::Remote => self.remote.as_ref().map(RemoteBackend::store),
            GatewayMode::Local => None,
        }
    }

    pub fn local(&self) -> &LocalBackend {
        &self.local
    }

    pub fn local_mut(&mut self) -> &mut LocalBackend {
        &mut self.local
    }

    /// Best-effort internal log line; a failing log never fails the caller.
    pub fn log(&mut self, operation: &str, target: &str, message: &str) {
        if let Err(e) = self.local.storage_mut().log(operation, target, message) {
            warning(format!("Failed to write internal log: {}", e));
        }
    }

    fn demote(&mut self, operation: &str, target: &str, err: &AppError) {
        self.mode = GatewayMode::Local;
        warning(format!(
            "Remote backend failed during {} ({}); continuing with local storage",
            operation, err
        ));
        self.log(
            "remote_fallback",
            target,
            &format!("{} failed remotely: {}", operation, err),
        );
    }

    fn route<T, F>(&mut self, operation: &str, target: &str, mut op: F) -> AppResult<T>
    where
        F: FnMut(&mut dyn PersistenceBackend) -> AppResult<T>,
    {
        if self.mode == GatewayMode::Remote
            && let Some(remote) = self.remote.as_mut()
        {
            match op(remote) {
                Ok(v) => return Ok(v),
                Err(e) => self.demote(operation, target, &e),
            }
        }
        op(&mut self.local)
    }

    pub fn load_teachers(&mut self, room: Room) -> AppResult<Vec<Teacher>> {
        self.route("load_teachers", room.code(), |b| b.load_teachers(room))
    }

    pub fn load_class_types(&mut self, room: Room) -> AppResult<Vec<ClassType>> {
        self.route("load_class_types", room.code(), |b| b.load_class_types(room))
    }

    pub fn load_schedule(&mut self, room: Room) -> AppResult<RoomSchedule> {
        self.route("load_schedule", room.code(), |b| b.load_schedule(room))
    }

    pub fn add_teacher(&mut self, name: &str, state: RoomState<'_>) -> AppResult<()> {
        self.route("add_teacher", name, |b| b.add_teacher(name, state))
    }

    pub fn rename_teacher(&mut self, old: &str, new: &str, state: RoomState<'_>) -> AppResult<()> {
        self.route("rename_teacher", old, |b| b.rename_teacher(old, new, state))
    }

    pub fn delete_teacher(
        &mut self,
        name: &str,
        cascade: &[EntryChange],
        state: RoomState<'_>,
    ) -> AppResult<()> {
        self.route("delete_teacher", name, |b| {
            b.delete_teacher(name, cascade, state)
        })
    }

    pub fn add_class_type(&mut self, name: &str, level: &str, state: RoomState<'_>) -> AppResult<()> {
        self.route("add_class_type", name, |b| b.add_class_type(name, level, state))
    }

    pub fn rename_class_type(
        &mut self,
        old: &str,
        new: &str,
        state: RoomState<'_>,
    ) -> AppResult<()> {
        self.route("rename_class_type", old, |b| {
            b.rename_class_type(old, new, state)
        })
    }

    pub fn delete_class_type(
        &mut self,
        name: &str,
        cascade: &[EntryChange],
        state: RoomState<'_>,
    ) -> AppResult<()> {
        self.route("delete_class_type", name, |b| {
            b.delete_class_type(name, cascade, state)
        })
    }

    pub fn put_entry(
        &mut self,
        day: Day,
        slot: TimeSlot,
        entry: &ClassEntry,
        state: RoomState<'_>,
    ) -> AppResult<()> {
        let target = format!("{} {} {}", state.room, day, slot);
        self.route("put_entry", &target, |b| b.put_entry(day, slot, entry, state))
    }

    pub fn delete_entry(&mut self, day: Day, slot: TimeSlot, state: RoomState<'_>) -> AppResult<()> {
        let target = format!("{} {} {}", state.room, day, slot);
        self.route("delete_entry", &target, |b| b.delete_entry(day, slot, state))
    }
}
