#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use rclassbook::config::Config;
use rclassbook::core::studio::Studio;
use rclassbook::models::room::Room;
use rclassbook::persistence::gateway::PersistenceGateway;
use rclassbook::persistence::memory::MemoryStorage;
use rclassbook::persistence::remote::{
    ChangeHandler, ClassTypeRecord, Collection, RemoteError, RemoteStore, ScheduleRecord,
    Subscription, TeacherRecord,
};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Binary under test, with HOME pointed at a scratch directory so the
/// operator's real config is never read or written.
pub fn rti() -> Command {
    let mut home: PathBuf = env::temp_dir();
    home.push("rclassbook_test_home");
    fs::create_dir_all(&home).ok();

    let mut cmd = cargo_bin_cmd!("rclassbook");
    cmd.env("HOME", &home).env("APPDATA", &home);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rclassbook.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize an empty DB and give the movement room a teacher roster and a catalog.
pub fn init_db_with_settings(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init", "--no-defaults"])
        .assert()
        .success();

    for teacher in ["Ana", "Ben"] {
        rti()
            .args(["--db", db_path, "teacher", "add", "movement", teacher])
            .assert()
            .success();
    }
    rti()
        .args(["--db", db_path, "class", "add", "movement", "Flow", "--level", "Beginner"])
        .assert()
        .success();
    rti()
        .args(["--db", db_path, "class", "add", "movement", "Power"])
        .assert()
        .success();
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

pub fn test_config() -> Config {
    Config {
        database: ":memory:".to_string(),
        ..Config::default()
    }
}

pub fn remote_config() -> Config {
    Config {
        use_remote: true,
        remote_url: "https://studio.example.test".to_string(),
        remote_key: "anon-key".to_string(),
        ..test_config()
    }
}

/// Local-only studio over shared in-memory storage.
pub fn local_studio(storage: &MemoryStorage) -> Studio {
    let gateway = PersistenceGateway::local_only(Box::new(storage.clone()));
    Studio::open(&test_config(), gateway)
        .expect("open studio")
        .with_today(today())
}

/// Studio starting in remote mode against `remote`.
pub fn remote_studio(storage: &MemoryStorage, remote: &Arc<FakeRemote>) -> Studio {
    let store: Arc<dyn RemoteStore> = remote.clone();
    let gateway = PersistenceGateway::new(&remote_config(), Box::new(storage.clone()), Some(store));
    Studio::open(&remote_config(), gateway)
        .expect("open studio")
        .with_today(today())
}

/// Local studio with Ana/Ben on the movement roster and Flow/Power classes.
pub fn seeded_local_studio(storage: &MemoryStorage) -> Studio {
    let mut studio = local_studio(storage);
    seed(&mut studio);
    studio
}

pub fn seed(studio: &mut Studio) {
    studio.add_teacher(Room::Movement, "Ana").expect("add Ana");
    studio.add_teacher(Room::Movement, "Ben").expect("add Ben");
    studio
        .add_class_type(Room::Movement, "Flow", Some("Beginner"))
        .expect("add Flow");
    studio
        .add_class_type(Room::Movement, "Power", None)
        .expect("add Power");
}

#[derive(Default)]
struct FakeState {
    teachers: Vec<TeacherRecord>,
    classes: Vec<ClassTypeRecord>,
    schedule: Vec<ScheduleRecord>,
    next_id: i64,
    handlers: Vec<(Collection, ChangeHandler)>,
}

/// In-memory remote store with failure injection.
#[derive(Default)]
pub struct FakeRemote {
    state: Mutex<FakeState>,
    fail_all: AtomicBool,
    fail_writes: AtomicBool,
    fail_subscribe: AtomicBool,
    fail_from_call: Mutex<Option<usize>>,
    calls: AtomicUsize,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_everything(&self, on: bool) {
        self.fail_all.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub fn fail_subscriptions(&self, on: bool) {
        self.fail_subscribe.store(on, Ordering::SeqCst);
    }

    /// Let `allowed` more calls through, then fail every call after them.
    pub fn fail_after(&self, allowed: usize) {
        *self.fail_from_call.lock().expect("lock") = Some(self.calls() + allowed);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn schedule_rows(&self) -> Vec<ScheduleRecord> {
        self.state.lock().expect("lock").schedule.clone()
    }

    pub fn teacher_names(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("lock")
            .teachers
            .iter()
            .map(|t| t.name.clone())
            .collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().expect("lock").handlers.len()
    }

    /// Simulate a change event; handlers fire once per subscription.
    pub fn emit(&self, collection: Collection) {
        let handlers: Vec<ChangeHandler> = self
            .state
            .lock()
            .expect("lock")
            .handlers
            .iter()
            .filter(|(c, _)| *c == collection)
            .map(|(_, h)| h.clone())
            .collect();
        for h in handlers {
            h();
        }
    }

    /// Write a row directly, as another client would.
    pub fn insert_row_as_other_client(&self, record: ScheduleRecord) {
        let mut s = self.state.lock().expect("lock");
        s.schedule
            .retain(|r| !(r.day == record.day && r.time == record.time && r.room == record.room));
        s.schedule.push(record);
    }

    pub fn teacher_id(&self, name: &str) -> Option<i64> {
        let s = self.state.lock().expect("lock");
        s.teachers.iter().find(|t| t.name == name).map(|t| t.id)
    }

    pub fn class_id(&self, name: &str) -> Option<i64> {
        let s = self.state.lock().expect("lock");
        s.classes.iter().find(|c| c.name == name).map(|c| c.id)
    }

    fn read(&self) -> Result<std::sync::MutexGuard<'_, FakeState>, RemoteError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let limit_hit = self
            .fail_from_call
            .lock()
            .expect("lock")
            .is_some_and(|limit| call >= limit);
        if limit_hit || self.fail_all.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("connection refused".into()));
        }
        Ok(self.state.lock().expect("lock"))
    }

    fn write(&self) -> Result<std::sync::MutexGuard<'_, FakeState>, RemoteError> {
        let guard = self.read()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RemoteError::Backend {
                status: 503,
                message: "service unavailable".into(),
            });
        }
        Ok(guard)
    }
}

impl RemoteStore for FakeRemote {
    fn list_teachers(&self, room: Option<Room>) -> Result<Vec<TeacherRecord>, RemoteError> {
        let s = self.read()?;
        Ok(s.teachers
            .iter()
            .filter(|t| room.is_none_or(|r| r == t.room))
            .cloned()
            .collect())
    }

    fn list_class_types(&self, room: Option<Room>) -> Result<Vec<ClassTypeRecord>, RemoteError> {
        let s = self.read()?;
        Ok(s.classes
            .iter()
            .filter(|c| room.is_none_or(|r| r == c.room))
            .cloned()
            .collect())
    }

    fn list_schedule(&self, room: Option<Room>) -> Result<Vec<ScheduleRecord>, RemoteError> {
        let s = self.read()?;
        Ok(s.schedule
            .iter()
            .filter(|e| room.is_none_or(|r| r == e.room))
            .cloned()
            .collect())
    }

    fn insert_teacher(&self, name: &str, room: Room) -> Result<TeacherRecord, RemoteError> {
        let mut s = self.write()?;
        s.next_id += 1;
        let rec = TeacherRecord {
            id: s.next_id,
            name: name.to_string(),
            room,
        };
        s.teachers.push(rec.clone());
        Ok(rec)
    }

    fn insert_class_type(
        &self,
        name: &str,
        room: Room,
        level: &str,
    ) -> Result<ClassTypeRecord, RemoteError> {
        let mut s = self.write()?;
        s.next_id += 1;
        let rec = ClassTypeRecord {
            id: s.next_id,
            name: name.to_string(),
            room,
            level: Some(level.to_string()),
        };
        s.classes.push(rec.clone());
        Ok(rec)
    }

    fn update_teacher_name(&self, id: i64, name: &str) -> Result<(), RemoteError> {
        let mut s = self.write()?;
        for t in s.teachers.iter_mut().filter(|t| t.id == id) {
            t.name = name.to_string();
        }
        Ok(())
    }

    fn update_class_type_name(&self, id: i64, name: &str) -> Result<(), RemoteError> {
        let mut s = self.write()?;
        for c in s.classes.iter_mut().filter(|c| c.id == id) {
            c.name = name.to_string();
        }
        Ok(())
    }

    fn delete_teacher(&self, id: i64) -> Result<(), RemoteError> {
        let mut s = self.write()?;
        s.teachers.retain(|t| t.id != id);
        Ok(())
    }

    fn delete_class_type(&self, id: i64) -> Result<(), RemoteError> {
        let mut s = self.write()?;
        s.classes.retain(|c| c.id != id);
        Ok(())
    }

    fn upsert_schedule(&self, record: &ScheduleRecord) -> Result<(), RemoteError> {
        let mut s = self.write()?;
        s.schedule
            .retain(|r| !(r.day == record.day && r.time == record.time && r.room == record.room));
        s.next_id += 1;
        let mut rec = record.clone();
        rec.id = Some(s.next_id);
        s.schedule.push(rec);
        Ok(())
    }

    fn delete_schedule(&self, day: &str, time: &str, room: Room) -> Result<(), RemoteError> {
        let mut s = self.write()?;
        s.schedule
            .retain(|r| !(r.day == day && r.time == time && r.room == room));
        Ok(())
    }

    fn subscribe(
        &self,
        collection: Collection,
        handler: ChangeHandler,
    ) -> Result<Subscription, RemoteError> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(RemoteError::Unsupported("realtime disabled".into()));
        }
        let mut s = self.read()?;
        s.handlers.push((collection, handler));
        Ok(Subscription::new(collection, None))
    }
}
