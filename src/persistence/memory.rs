//! In-process `LocalStorage`, for embedding callers and tests.
//!
//! Clones share the same state, so a caller can hand one copy to a gateway
//! and keep another to inspect what was written.

use super::LocalStorage;
use crate::errors::{AppError, AppResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    values: BTreeMap<String, String>,
    log: Vec<(String, String, String)>,
    fail_writes: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Other("memory storage lock poisoned".into()))
    }

    /// Make every subsequent write fail, to exercise rollback paths.
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut s) = self.lock() {
            s.fail_writes = failing;
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock()
            .map(|s| s.values.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Logged `(operation, target, message)` rows, oldest first.
    pub fn log_entries(&self) -> Vec<(String, String, String)> {
        self.lock().map(|s| s.log.clone()).unwrap_or_default()
    }

    fn writable(&self) -> AppResult<MutexGuard<'_, MemoryState>> {
        let guard = self.lock()?;
        if guard.fail_writes {
            return Err(AppError::Other("local storage rejected the write".into()));
        }
        Ok(guard)
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.writable()?
            .values
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&mut self, pairs: &[(String, String)]) -> AppResult<()> {
        let mut state = self.writable()?;
        for (k, v) in pairs {
            state.values.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.writable()?.values.remove(key);
        Ok(())
    }

    fn log(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        self.lock()?.log.push((
            operation.to_string(),
            target.to_string(),
            message.to_string(),
        ));
        Ok(())
    }
}
