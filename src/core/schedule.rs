//! Per-room schedule store: day → start slot → class entry.

use crate::core::grid::TimeGrid;
use crate::core::occupancy::OccupancyEngine;
use crate::errors::{AppError, AppResult};
use crate::models::class_entry::ClassEntry;
use crate::models::day::Day;
use crate::models::room::Room;
use crate::models::time_slot::TimeSlot;
use std::collections::BTreeMap;

/// Entries of one room on one day, keyed by start slot only.
pub type DaySchedule = BTreeMap<TimeSlot, ClassEntry>;

/// Result of `ScheduleStore::put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Added,
    Updated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSchedule {
    days: BTreeMap<Day, DaySchedule>,
}

impl RoomSchedule {
    /// Build from raw day maps, dropping empty days.
    pub fn from_days(days: BTreeMap<Day, DaySchedule>) -> Self {
        let mut schedule = Self { days };
        schedule.normalize();
        schedule
    }

    pub fn day(&self, day: Day) -> Option<&DaySchedule> {
        self.days.get(&day)
    }

    pub fn days(&self) -> impl Iterator<Item = (Day, &DaySchedule)> {
        self.days.iter().map(|(d, s)| (*d, s))
    }

    pub fn get(&self, day: Day, slot: TimeSlot) -> Option<&ClassEntry> {
        self.days.get(&day).and_then(|d| d.get(&slot))
    }

    /// Every entry in day order, then slot order.
    pub fn entries(&self) -> impl Iterator<Item = (Day, TimeSlot, &ClassEntry)> {
        self.days
            .iter()
            .flat_map(|(day, slots)| slots.iter().map(move |(slot, e)| (*day, *slot, e)))
    }

    pub fn len(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    fn normalize(&mut self) {
        self.days.retain(|_, slots| !slots.is_empty());
    }
}

/// Schedule of one room plus the operations that keep its spans disjoint.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    room: Room,
    schedule: RoomSchedule,
}

impl ScheduleStore {
    pub fn new(room: Room) -> Self {
        Self {
            room,
            schedule: RoomSchedule::default(),
        }
    }

    pub fn with_schedule(room: Room, schedule: RoomSchedule) -> Self {
        Self { room, schedule }
    }

    pub fn room(&self) -> Room {
        self.room
    }

    pub fn schedule(&self) -> &RoomSchedule {
        &self.schedule
    }

    pub fn get(&self, day: Day, slot: TimeSlot) -> Option<&ClassEntry> {
        self.schedule.get(day, slot)
    }

    pub fn day(&self, day: Day) -> Option<&DaySchedule> {
        self.schedule.day(day)
    }

    fn check_slot(grid: &TimeGrid, slot: TimeSlot) -> AppResult<()> {
        if grid.contains(slot) {
            Ok(())
        } else {
            Err(AppError::InvalidTime(format!("{} is not on the schedule grid", slot)))
        }
    }

    /// Insert a new entry at an empty start slot.
    pub fn add(
        &mut self,
        engine: &OccupancyEngine,
        grid: &TimeGrid,
        day: Day,
        start: TimeSlot,
        entry: ClassEntry,
    ) -> AppResult<()> {
        entry.validate(engine.max_duration())?;
        Self::check_slot(grid, start)?;

        let empty = DaySchedule::new();
        let current = self.schedule.days.get(&day).unwrap_or(&empty);
        if engine.would_overlap(current, start, entry.duration_minutes, grid) {
            return Err(AppError::Overlap {
                day: day.to_string(),
                slot: start.label(),
            });
        }

        self.schedule
            .days
            .entry(day)
            .or_default()
            .insert(start, entry);
        Ok(())
    }

    /// Replace the entry keyed at `start`; its own span is ignored by the
    /// overlap check.
    pub fn replace(
        &mut self,
        engine: &OccupancyEngine,
        grid: &TimeGrid,
        day: Day,
        start: TimeSlot,
        entry: ClassEntry,
    ) -> AppResult<ClassEntry> {
        entry.validate(engine.max_duration())?;
        Self::check_slot(grid, start)?;

        let Some(current) = self.schedule.days.get(&day).filter(|d| d.contains_key(&start))
        else {
            return Err(AppError::NotFound(format!(
                "no class at {} on {} in the {} room",
                start, day, self.room
            )));
        };

        if engine.would_overlap_ignoring(current, start, entry.duration_minutes, grid, start) {
            return Err(AppError::Overlap {
                day: day.to_string(),
                slot: start.label(),
            });
        }

        let slots = self.schedule.days.entry(day).or_default();
        slots
            .insert(start, entry)
            .ok_or_else(|| AppError::Other("entry vanished during replace".into()))
    }

    /// Add when the slot is empty, otherwise edit the existing entry.
    pub fn put(
        &mut self,
        engine: &OccupancyEngine,
        grid: &TimeGrid,
        day: Day,
        start: TimeSlot,
        entry: ClassEntry,
    ) -> AppResult<PutOutcome> {
        if self.get(day, start).is_some() {
            self.replace(engine, grid, day, start, entry)?;
            Ok(PutOutcome::Updated)
        } else {
            self.add(engine, grid, day, start, entry)?;
            Ok(PutOutcome::Added)
        }
    }

    /// Remove the entry keyed at `start`. An emptied day is dropped.
    pub fn remove(&mut self, day: Day, start: TimeSlot) -> AppResult<ClassEntry> {
        let removed = self
            .schedule
            .days
            .get_mut(&day)
            .and_then(|slots| slots.remove(&start))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no class at {} on {} in the {} room",
                    start, day, self.room
                ))
            })?;

        self.schedule.normalize();
        Ok(removed)
    }

    /// Propagate a teacher rename to every entry. Returns the number changed.
    pub fn rename_teacher(&mut self, old: &str, new: &str) -> usize {
        self.rewrite(|e| {
            if e.teacher_name == old {
                e.teacher_name = new.to_string();
                true
            } else {
                false
            }
        })
    }

    /// Propagate a class-type rename to every entry. Returns the number changed.
    pub fn rename_class(&mut self, old: &str, new: &str) -> usize {
        self.rewrite(|e| {
            if e.class_name == old {
                e.class_name = new.to_string();
                true
            } else {
                false
            }
        })
    }

    /// Hand every class of `teacher` to `replacement`.
    pub fn reassign_teacher(&mut self, teacher: &str, replacement: &str) -> usize {
        self.rename_teacher(teacher, replacement)
    }

    /// Drop every entry taught by `teacher`; returns the removed positions.
    pub fn remove_by_teacher(&mut self, teacher: &str) -> Vec<(Day, TimeSlot)> {
        self.remove_where(|e| e.teacher_name == teacher)
    }

    /// Drop every entry of class type `class_name`; returns the removed positions.
    pub fn remove_by_class(&mut self, class_name: &str) -> Vec<(Day, TimeSlot)> {
        self.remove_where(|e| e.class_name == class_name)
    }

    fn rewrite<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&mut ClassEntry) -> bool,
    {
        let mut changed = 0;
        for slots in self.schedule.days.values_mut() {
            for entry in slots.values_mut() {
                if f(entry) {
                    changed += 1;
                }
            }
        }
        changed
    }

    fn remove_where<F>(&mut self, pred: F) -> Vec<(Day, TimeSlot)>
    where
        F: Fn(&ClassEntry) -> bool,
    {
        let mut removed = Vec::new();
        for (day, slots) in self.schedule.days.iter_mut() {
            slots.retain(|slot, entry| {
                if pred(&*entry) {
                    removed.push((*day, *slot));
                    false
                } else {
                    true
                }
            });
        }
        self.schedule.normalize();
        removed
    }
}
