//! One-shot push of locally stored data to the remote store.
//!
//! Item failures are counted and logged but never abort the run or demote
//! the gateway. The marker key is written once the run finishes so later
//! runs are skipped unless forced.

use crate::errors::{AppError, AppResult};
use crate::models::room::Room;
use crate::persistence::gateway::PersistenceGateway;
use crate::persistence::remote::{RemoteStore, ScheduleRecord};
use crate::persistence::{MIGRATION_MARKER_KEY, PersistenceBackend};
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindReport {
    pub pushed: usize,
    /// Already present remotely under the same name.
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub teachers: KindReport,
    pub class_types: KindReport,
    pub entries: KindReport,
}

impl SyncReport {
    pub fn total_failed(&self) -> usize {
        self.teachers.failed + self.class_types.failed + self.entries.failed
    }
}

/// Remote mode, local schedule data present, marker absent.
pub fn needs_migration(gateway: &PersistenceGateway) -> AppResult<bool> {
    if !gateway.is_remote() {
        return Ok(false);
    }
    let local = gateway.local();
    if local.storage().get(MIGRATION_MARKER_KEY)?.is_some() {
        return Ok(false);
    }
    local.has_schedule_data()
}

/// Run the push. `Ok(None)` means there was nothing to do.
pub fn push_local_to_remote(gateway: &mut PersistenceGateway, force: bool) -> AppResult<Option<SyncReport>> {
    let Some(store) = gateway.remote_store() else {
        return Err(AppError::RemoteUnavailable(
            "remote backend is not configured or has been disabled".into(),
        ));
    };
    if !force && !needs_migration(gateway)? {
        return Ok(None);
    }

    let mut report = SyncReport::default();
    for room in Room::ALL {
        push_room(gateway, store.as_ref(), room, &mut report)?;
    }

    let stamp = Local::now().to_rfc3339();
    gateway
        .local_mut()
        .storage_mut()
        .set(MIGRATION_MARKER_KEY, &stamp)?;
    gateway.log(
        "remote_sync",
        "all",
        &format!(
            "pushed {}/{}/{} (teachers/classes/entries), {} failed",
            report.teachers.pushed,
            report.class_types.pushed,
            report.entries.pushed,
            report.total_failed()
        ),
    );
    Ok(Some(report))
}

fn push_room(
    gateway: &mut PersistenceGateway,
    store: &dyn RemoteStore,
    room: Room,
    report: &mut SyncReport,
) -> AppResult<()> {
    let local = gateway.local_mut();
    let teachers = local.load_teachers(room)?;
    let classes = local.load_class_types(room)?;
    let schedule = local.load_schedule(room)?;

    let mut failures: Vec<String> = Vec::new();

    let mut teacher_ids: HashMap<String, i64> = match store.list_teachers(Some(room)) {
        Ok(rows) => rows.into_iter().map(|t| (t.name, t.id)).collect(),
        Err(e) => {
            failures.push(format!("listing {} teachers: {}", room, e));
            HashMap::new()
        }
    };
    for teacher in &teachers {
        if teacher_ids.contains_key(&teacher.name) {
            report.teachers.skipped += 1;
            continue;
        }
        match store.insert_teacher(&teacher.name, room) {
            Ok(rec) => {
                teacher_ids.insert(rec.name, rec.id);
                report.teachers.pushed += 1;
            }
            Err(e) => {
                report.teachers.failed += 1;
                failures.push(format!("teacher '{}': {}", teacher.name, e));
            }
        }
    }

    let mut class_ids: HashMap<String, i64> = match store.list_class_types(Some(room)) {
        Ok(rows) => rows.into_iter().map(|c| (c.name, c.id)).collect(),
        Err(e) => {
            failures.push(format!("listing {} class types: {}", room, e));
            HashMap::new()
        }
    };
    for class in &classes {
        if class_ids.contains_key(&class.name) {
            report.class_types.skipped += 1;
            continue;
        }
        match store.insert_class_type(&class.name, room, &class.default_level) {
            Ok(rec) => {
                class_ids.insert(rec.name, rec.id);
                report.class_types.pushed += 1;
            }
            Err(e) => {
                report.class_types.failed += 1;
                failures.push(format!("class type '{}': {}", class.name, e));
            }
        }
    }

    for (day, slot, entry) in schedule.entries() {
        let (Some(class_id), Some(teacher_id)) = (
            class_ids.get(&entry.class_name),
            teacher_ids.get(&entry.teacher_name),
        ) else {
            report.entries.failed += 1;
            failures.push(format!(
                "entry {} {} {}: unresolved class or teacher",
                room, day, slot
            ));
            continue;
        };
        let record = ScheduleRecord {
            id: None,
            day: day.name().to_string(),
            time: slot.label(),
            room,
            class_id: *class_id,
            teacher_id: *teacher_id,
            session_type: Some(entry.session_type.clone()),
            start_date: entry.start_date,
            duration: Some(entry.duration_minutes),
        };
        match store.upsert_schedule(&record) {
            Ok(()) => report.entries.pushed += 1,
            Err(e) => {
                report.entries.failed += 1;
                failures.push(format!("entry {} {} {}: {}", room, day, slot, e));
            }
        }
    }

    for failure in failures {
        gateway.log("remote_sync_failed", room.code(), &failure);
    }
    Ok(())
}

