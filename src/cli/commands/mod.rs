pub mod add;
pub mod class;
pub mod config;
pub mod del;
pub mod init;
pub mod log;
pub mod show;
pub mod stats;
pub mod status;
pub mod sync;
pub mod teacher;

use crate::config::Config;
use crate::core::studio::Studio;
use crate::core::sync::needs_migration;
use crate::db::kv::SqliteStorage;
use crate::errors::{AppError, AppResult};
use crate::models::day::Day;
use crate::models::room::Room;
use crate::persistence::gateway::PersistenceGateway;
use crate::persistence::remote::RemoteStore;
use crate::persistence::rest::RestRemote;
use crate::ui::messages::{info, warning};
use std::io::{self, Write};
use std::sync::Arc;

pub(crate) fn parse_room(s: &str) -> AppResult<Room> {
    Room::from_code(s).ok_or_else(|| AppError::InvalidRoom(s.to_string()))
}

pub(crate) fn parse_day(s: &str) -> AppResult<Day> {
    Day::from_name(s).ok_or_else(|| AppError::InvalidDay(s.to_string()))
}

/// Rooms named by an optional CLI argument; both when absent.
pub(crate) fn rooms_for(arg: Option<&str>) -> AppResult<Vec<Room>> {
    match arg {
        Some(r) => Ok(vec![parse_room(r)?]),
        None => Ok(Room::ALL.to_vec()),
    }
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn remote_client(cfg: &Config) -> Option<Arc<dyn RemoteStore>> {
    if !cfg.use_remote {
        return None;
    }
    if !cfg.has_valid_credentials() {
        warning("use_remote is set but remote_url/remote_key are missing; using local storage");
        return None;
    }
    match RestRemote::new(&cfg.remote_url, &cfg.remote_key, cfg.remote_timeout_secs) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warning(format!("Remote client unavailable ({}); using local storage", e));
            None
        }
    }
}

/// Open local storage, wire the remote client if configured, and load the studio.
pub(crate) fn open_studio(cfg: &Config) -> AppResult<Studio> {
    let storage = SqliteStorage::open(&cfg.database)?;
    let gateway = PersistenceGateway::new(cfg, Box::new(storage), remote_client(cfg));
    let studio = Studio::open(cfg, gateway)?;

    if needs_migration(studio.gateway())? {
        info("Local schedule data has not been pushed to the remote store yet; run `rclassbook sync`.");
    }
    Ok(studio)
}
