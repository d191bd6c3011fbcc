use super::time_slot::{SLOT_MINUTES, span_for};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DURATION: u32 = 45;
pub const DEFAULT_SESSION_TYPE: &str = "Mixed";

fn default_duration() -> u32 {
    DEFAULT_DURATION
}

fn default_session_type() -> String {
    DEFAULT_SESSION_TYPE.to_string()
}

/// One scheduled class occupying one or more consecutive slots.
///
/// Field names on the wire follow the blob layout used by local storage
/// (`class`, `teacher`, `type`, `duration`, `startDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(rename = "teacher")]
    pub teacher_name: String,
    #[serde(default)]
    pub level: String,
    #[serde(rename = "type", default = "default_session_type")]
    pub session_type: String,
    #[serde(rename = "duration", default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(rename = "startDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl ClassEntry {
    /// Entry with default session type and duration; level is left empty
    /// until the class type default is applied.
    pub fn new(class_name: &str, teacher_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            teacher_name: teacher_name.to_string(),
            level: String::new(),
            session_type: default_session_type(),
            duration_minutes: DEFAULT_DURATION,
            start_date: None,
        }
    }

    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self
    }

    pub fn with_session_type(mut self, session_type: &str) -> Self {
        self.session_type = session_type.to_string();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = date;
        self
    }

    /// Number of consecutive slots consumed from the start slot.
    pub fn span_slots(&self) -> usize {
        span_for(self.duration_minutes)
    }

    /// An entry with a future start date is inactive until that date arrives.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        match self.start_date {
            Some(start) => today >= start,
            None => true,
        }
    }

    pub fn is_ladies_only(&self) -> bool {
        self.session_type.eq_ignore_ascii_case("Ladies Only")
    }

    /// Structural checks done before any overlap test or persistence attempt.
    pub fn validate(&self, max_duration: u32) -> AppResult<()> {
        if self.class_name.trim().is_empty() {
            return Err(AppError::Validation("a class is required".into()));
        }
        if self.teacher_name.trim().is_empty() {
            return Err(AppError::Validation("a teacher is required".into()));
        }
        if self.duration_minutes == 0 || self.duration_minutes % SLOT_MINUTES != 0 {
            return Err(AppError::Validation(format!(
                "duration must be a positive multiple of {} minutes (got {})",
                SLOT_MINUTES, self.duration_minutes
            )));
        }
        if self.duration_minutes > max_duration {
            return Err(AppError::Validation(format!(
                "duration {} exceeds the maximum of {} minutes",
                self.duration_minutes, max_duration
            )));
        }
        Ok(())
    }
}
