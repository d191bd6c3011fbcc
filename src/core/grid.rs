//! Daily time grid: the ordered, gap-free run of 15-minute slots shared by
//! every room.

use crate::errors::{AppError, AppResult};
use crate::models::time_slot::{SLOT_MINUTES, TimeSlot};

/// Slots from `start_hour:00` to `end_hour:00`, both inclusive.
/// The end hour contributes only its `:00` slot.
pub fn generate_slots(start_hour: u32, end_hour: u32) -> Vec<TimeSlot> {
    let first = start_hour * 60;
    let last = end_hour * 60;

    (first..=last)
        .step_by(SLOT_MINUTES as usize)
        .filter_map(TimeSlot::from_minutes)
        .collect()
}

#[derive(Debug, Clone)]
pub struct TimeGrid {
    slots: Vec<TimeSlot>,
    first_minute: u32,
}

impl TimeGrid {
    pub fn new(start_hour: u32, end_hour: u32) -> AppResult<Self> {
        if end_hour > 23 || start_hour > end_hour {
            return Err(AppError::Config(format!(
                "invalid grid bounds: start_hour={} end_hour={} (need start <= end <= 23)",
                start_hour, end_hour
            )));
        }

        Ok(Self {
            slots: generate_slots(start_hour, end_hour),
            first_minute: start_hour * 60,
        })
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<TimeSlot> {
        self.slots.get(index).copied()
    }

    /// Position of `slot` in the grid; `None` when the slot lies outside it.
    pub fn index_of(&self, slot: TimeSlot) -> Option<usize> {
        let minutes = slot.minutes().checked_sub(self.first_minute)?;
        let index = (minutes / SLOT_MINUTES) as usize;
        (index < self.slots.len()).then_some(index)
    }

    pub fn contains(&self, slot: TimeSlot) -> bool {
        self.index_of(slot).is_some()
    }

    /// Resolve a user-supplied label to a slot on this grid.
    pub fn parse_slot(&self, label: &str) -> AppResult<TimeSlot> {
        let slot =
            TimeSlot::parse(label).ok_or_else(|| AppError::InvalidTime(label.to_string()))?;

        if !self.contains(slot) {
            return Err(AppError::InvalidTime(format!(
                "{} is outside the schedule ({} to {})",
                slot,
                self.slots.first().map(|s| s.label()).unwrap_or_default(),
                self.slots.last().map(|s| s.label()).unwrap_or_default(),
            )));
        }
        Ok(slot)
    }
}
