//! Usage statistics over one room or the whole studio.

use crate::core::schedule::RoomSchedule;
use crate::models::day::Day;
use crate::models::room::Room;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageStats {
    pub total_classes: usize,
    /// Distinct teachers with at least one scheduled class.
    pub active_teachers: usize,
    /// Distinct class types that appear in the schedule.
    pub class_types: usize,
    /// Classes per teacher, busiest first, ties by name.
    pub teacher_load: Vec<(String, usize)>,
    pub by_room: BTreeMap<Room, usize>,
    pub by_class: BTreeMap<String, usize>,
    pub by_session_type: BTreeMap<String, usize>,
    pub by_level: BTreeMap<String, usize>,
    /// All seven days, Sunday first, zero included.
    pub by_day: Vec<(Day, usize)>,
}

pub fn compute<'a, I>(schedules: I) -> UsageStats
where
    I: IntoIterator<Item = (Room, &'a RoomSchedule)>,
{
    let mut stats = UsageStats::default();
    let mut load: BTreeMap<String, usize> = BTreeMap::new();
    let mut classes: BTreeSet<String> = BTreeSet::new();
    let mut days: BTreeMap<Day, usize> = BTreeMap::new();

    for (room, schedule) in schedules {
        let room_count = stats.by_room.entry(room).or_insert(0);
        for (day, _, entry) in schedule.entries() {
            *room_count += 1;
            stats.total_classes += 1;
            *load.entry(entry.teacher_name.clone()).or_insert(0) += 1;
            classes.insert(entry.class_name.clone());
            *days.entry(day).or_insert(0) += 1;
            *stats.by_class.entry(entry.class_name.clone()).or_insert(0) += 1;
            *stats
                .by_session_type
                .entry(entry.session_type.clone())
                .or_insert(0) += 1;
            if !entry.level.is_empty() {
                *stats.by_level.entry(entry.level.clone()).or_insert(0) += 1;
            }
        }
    }

    stats.active_teachers = load.len();
    stats.class_types = classes.len();

    let mut teacher_load: Vec<(String, usize)> = load.into_iter().collect();
    teacher_load.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    stats.teacher_load = teacher_load;

    stats.by_day = Day::ALL
        .into_iter()
        .map(|d| (d, days.get(&d).copied().unwrap_or(0)))
        .collect();

    stats
}
