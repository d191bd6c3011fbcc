//! Unified application error type.
//! All modules (core, persistence, db, cli) return AppError so that the
//! operator-facing surface handles every failure the same way.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time slot: {0}")]
    InvalidTime(String),

    #[error("Invalid day: {0}")]
    InvalidDay(String),

    #[error("Invalid room: {0}")]
    InvalidRoom(String),

    // ---------------------------
    // Scheduling errors
    // ---------------------------
    #[error("Cannot add class at {slot} on {day}: it would overlap with an existing class")]
    Overlap { day: String, slot: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // ---------------------------
    // Persistence errors
    // ---------------------------
    #[error("Remote backend unavailable: {0}")]
    RemoteUnavailable(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
