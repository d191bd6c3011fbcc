use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes covered by one grid slot.
pub const SLOT_MINUTES: u32 = 15;

/// A point in the day at 15-minute resolution.
///
/// Ordering follows clock time. The textual form is the 12-hour label used
/// across storage and the remote schema (`9:00 AM`, `12:15 PM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    minutes: u32, // minutes since midnight
}

impl TimeSlot {
    /// Build a slot from hour/minute; `None` if not aligned to the 15-minute grid.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || minute % SLOT_MINUTES != 0 {
            return None;
        }
        Some(Self {
            minutes: hour * 60 + minute,
        })
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::from_hm(minutes / 60, minutes % 60)
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn hour(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes % 60
    }

    /// 12-hour clock label, hour unpadded, minutes zero-padded.
    pub fn label(&self) -> String {
        let hour = self.hour();
        let display_hour = match hour {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        };
        let period = if hour >= 12 { "PM" } else { "AM" };
        format!("{}:{:02} {}", display_hour, self.minute(), period)
    }

    /// Parse either a 12-hour label (`9:15 AM`) or a 24-hour `HH:MM` value.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let time = NaiveTime::parse_from_str(&s.to_uppercase(), "%I:%M %p")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()?;
        if time.second() != 0 {
            return None;
        }
        Self::from_hm(time.hour(), time.minute())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid time slot '{}'", value))
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label()
    }
}

/// Number of grid slots a class of `duration_minutes` consumes (at least one).
pub fn span_for(duration_minutes: u32) -> usize {
    duration_minutes.div_ceil(SLOT_MINUTES).max(1) as usize
}
