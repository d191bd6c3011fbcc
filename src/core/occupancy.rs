//! Occupancy engine.
//!
//! A `DaySchedule` keys entries by their start slot only. Whether any other
//! slot is covered has to be derived by scanning backwards for an entry whose
//! span reaches the queried slot. The scan window is derived from the
//! configured maximum duration.

use crate::core::grid::TimeGrid;
use crate::core::schedule::DaySchedule;
use crate::models::class_entry::ClassEntry;
use crate::models::time_slot::{TimeSlot, span_for};
use chrono::NaiveDate;

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy<'a> {
    Free,
    Start {
        entry: &'a ClassEntry,
    },
    Middle {
        entry: &'a ClassEntry,
        span_start: TimeSlot,
    },
    End {
        entry: &'a ClassEntry,
        span_start: TimeSlot,
    },
}

impl<'a> Occupancy<'a> {
    pub fn is_free(&self) -> bool {
        matches!(self, Occupancy::Free)
    }

    pub fn entry(&self) -> Option<&'a ClassEntry> {
        match *self {
            Occupancy::Free => None,
            Occupancy::Start { entry }
            | Occupancy::Middle { entry, .. }
            | Occupancy::End { entry, .. } => Some(entry),
        }
    }

    pub fn position(&self) -> &'static str {
        match self {
            Occupancy::Free => "free",
            Occupancy::Start { .. } => "start",
            Occupancy::Middle { .. } => "middle",
            Occupancy::End { .. } => "end",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OccupancyEngine {
    max_duration_minutes: u32,
    max_span_slots: usize,
}

impl OccupancyEngine {
    pub fn new(max_duration_minutes: u32) -> Self {
        Self {
            max_duration_minutes,
            max_span_slots: span_for(max_duration_minutes),
        }
    }

    /// Longest duration a new entry may have.
    pub fn max_duration(&self) -> u32 {
        self.max_duration_minutes
    }

    pub fn max_span_slots(&self) -> usize {
        self.max_span_slots
    }

    /// Scan window for `day`: the configured cap, widened when stored data
    /// already holds a longer entry.
    fn lookback(&self, day: &DaySchedule) -> usize {
        day.values()
            .map(ClassEntry::span_slots)
            .max()
            .unwrap_or(1)
            .max(self.max_span_slots)
    }

    pub fn classify<'a>(
        &self,
        day: &'a DaySchedule,
        slot: TimeSlot,
        grid: &TimeGrid,
    ) -> Occupancy<'a> {
        self.classify_filtered(day, slot, grid, |_| true)
    }

    /// Like `classify`, but entries not yet active on `today` read as free.
    pub fn classify_active<'a>(
        &self,
        day: &'a DaySchedule,
        slot: TimeSlot,
        grid: &TimeGrid,
        today: NaiveDate,
    ) -> Occupancy<'a> {
        self.classify_filtered(day, slot, grid, |e| e.is_active_on(today))
    }

    fn classify_filtered<'a, F>(
        &self,
        day: &'a DaySchedule,
        slot: TimeSlot,
        grid: &TimeGrid,
        visible: F,
    ) -> Occupancy<'a>
    where
        F: Fn(&ClassEntry) -> bool,
    {
        let Some(index) = grid.index_of(slot) else {
            return Occupancy::Free;
        };

        if let Some(entry) = day.get(&slot) {
            return if visible(entry) {
                Occupancy::Start { entry }
            } else {
                Occupancy::Free
            };
        }

        let window = self.lookback(day);

        // nearest preceding start first
        for back in 1..window {
            let Some(start_index) = index.checked_sub(back) else {
                break;
            };
            let Some(span_start) = grid.get(start_index) else {
                break;
            };
            let Some(entry) = day.get(&span_start) else {
                continue;
            };

            let end_index = start_index + entry.span_slots() - 1;
            if index > end_index {
                continue;
            }
            if !visible(entry) {
                return Occupancy::Free;
            }
            return if index == end_index {
                Occupancy::End { entry, span_start }
            } else {
                Occupancy::Middle { entry, span_start }
            };
        }

        Occupancy::Free
    }

    /// Slots strictly after `start` that an entry of `duration_minutes`
    /// would also occupy. Truncated at the end of the grid.
    pub fn overlapping_slots(
        &self,
        start: TimeSlot,
        duration_minutes: u32,
        grid: &TimeGrid,
    ) -> Vec<TimeSlot> {
        let Some(start_index) = grid.index_of(start) else {
            return Vec::new();
        };

        (1..span_for(duration_minutes))
            .map_while(|offset| grid.get(start_index + offset))
            .collect()
    }

    /// True when a new entry at `start` would collide with an existing one:
    /// either `start` is already taken (keyed or inside another span), or a
    /// later slot in the new span keys an entry.
    pub fn would_overlap(
        &self,
        day: &DaySchedule,
        start: TimeSlot,
        duration_minutes: u32,
        grid: &TimeGrid,
    ) -> bool {
        self.would_overlap_inner(day, start, duration_minutes, grid, None)
    }

    /// Overlap check for editing the entry keyed at `ignore` in place.
    pub fn would_overlap_ignoring(
        &self,
        day: &DaySchedule,
        start: TimeSlot,
        duration_minutes: u32,
        grid: &TimeGrid,
        ignore: TimeSlot,
    ) -> bool {
        self.would_overlap_inner(day, start, duration_minutes, grid, Some(ignore))
    }

    fn would_overlap_inner(
        &self,
        day: &DaySchedule,
        start: TimeSlot,
        duration_minutes: u32,
        grid: &TimeGrid,
        ignore: Option<TimeSlot>,
    ) -> bool {
        match ignore {
            Some(skip) if day.contains_key(&skip) => {
                let mut rest = day.clone();
                rest.remove(&skip);
                self.collides(&rest, start, duration_minutes, grid)
            }
            _ => self.collides(day, start, duration_minutes, grid),
        }
    }

    fn collides(
        &self,
        day: &DaySchedule,
        start: TimeSlot,
        duration_minutes: u32,
        grid: &TimeGrid,
    ) -> bool {
        !self.classify(day, start, grid).is_free()
            || self.any_keyed(day, start, duration_minutes, grid)
    }

    fn any_keyed(
        &self,
        day: &DaySchedule,
        start: TimeSlot,
        duration_minutes: u32,
        grid: &TimeGrid,
    ) -> bool {
        self.overlapping_slots(start, duration_minutes, grid)
            .iter()
            .any(|slot| day.contains_key(slot))
    }
}
