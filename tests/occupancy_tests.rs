mod common;

use chrono::NaiveDate;
use rclassbook::core::grid::{TimeGrid, generate_slots};
use rclassbook::core::occupancy::{Occupancy, OccupancyEngine};
use rclassbook::core::schedule::{DaySchedule, ScheduleStore};
use rclassbook::errors::AppError;
use rclassbook::models::class_entry::ClassEntry;
use rclassbook::models::day::Day;
use rclassbook::models::room::Room;
use rclassbook::models::time_slot::TimeSlot;

fn grid() -> TimeGrid {
    TimeGrid::new(5, 21).expect("default grid")
}

fn slot(label: &str) -> TimeSlot {
    TimeSlot::parse(label).expect("valid slot")
}

fn day_with(entries: &[(&str, u32)]) -> DaySchedule {
    let mut day = DaySchedule::new();
    for (label, duration) in entries {
        day.insert(
            slot(label),
            ClassEntry::new("Flow", "Ana").with_duration(*duration),
        );
    }
    day
}

#[test]
fn test_generate_slots_covers_start_to_end_hour() {
    let slots = generate_slots(5, 21);
    // 16 full hours of four slots, plus 9:00 PM
    assert_eq!(slots.len(), 16 * 4 + 1);
    assert_eq!(slots[0].label(), "5:00 AM");
    assert_eq!(slots[1].label(), "5:15 AM");
    assert_eq!(slots.last().map(|s| s.label()), Some("9:00 PM".to_string()));
}

#[test]
fn test_labels_and_parsing() {
    assert_eq!(slot("12:15 PM").label(), "12:15 PM");
    assert_eq!(slot("13:45").label(), "1:45 PM");
    assert_eq!(slot("9:00 am"), slot("09:00"));
    assert!(TimeSlot::parse("9:10 AM").is_none());
    assert!(TimeSlot::parse("noon").is_none());
}

#[test]
fn test_index_of_is_none_outside_grid() {
    let g = grid();
    assert_eq!(g.index_of(slot("5:00 AM")), Some(0));
    assert_eq!(g.index_of(slot("6:15 AM")), Some(5));
    assert_eq!(g.index_of(slot("4:45 AM")), None);
    assert_eq!(g.index_of(slot("9:15 PM")), None);
    assert!(g.parse_slot("10:00 PM").is_err());
    assert!(g.parse_slot("bogus").is_err());
}

#[test]
fn test_invalid_hours_rejected() {
    assert!(TimeGrid::new(10, 9).is_err());
    assert!(TimeGrid::new(5, 24).is_err());
    assert_eq!(TimeGrid::new(7, 7).map(|g| g.len()).ok(), Some(1));
}

#[test]
fn test_span_classification_for_every_duration() {
    let g = grid();
    let engine = OccupancyEngine::new(90);
    let start = slot("9:00 AM");
    let start_idx = g.index_of(start).expect("on grid");

    for duration in (15..=90).step_by(15) {
        let day = day_with(&[("9:00 AM", duration)]);
        let span = (duration / 15) as usize;

        for (i, s) in g.slots().iter().enumerate() {
            let occ = engine.classify(&day, *s, &g);
            let expected = if i == start_idx {
                "start"
            } else if i > start_idx && i < start_idx + span - 1 {
                "middle"
            } else if span > 1 && i == start_idx + span - 1 {
                "end"
            } else {
                "free"
            };
            assert_eq!(occ.position(), expected, "duration {} slot {}", duration, s);
        }
    }
}

#[test]
fn test_monday_scenario() {
    let g = grid();
    let engine = OccupancyEngine::new(90);
    let day = day_with(&[("9:00 AM", 45)]);

    match engine.classify(&day, slot("9:15 AM"), &g) {
        Occupancy::Middle { span_start, .. } => assert_eq!(span_start, slot("9:00 AM")),
        other => panic!("expected middle, got {}", other.position()),
    }
    assert_eq!(engine.classify(&day, slot("9:30 AM"), &g).position(), "end");
    assert!(engine.classify(&day, slot("9:45 AM"), &g).is_free());

    for duration in [15, 30, 45, 60, 90] {
        assert!(engine.would_overlap(&day, slot("9:30 AM"), duration, &g));
    }
    assert!(!engine.would_overlap(&day, slot("9:45 AM"), 45, &g));
}

#[test]
fn test_new_span_running_into_next_entry_overlaps() {
    let g = grid();
    let engine = OccupancyEngine::new(90);
    let day = day_with(&[("10:00 AM", 30)]);

    assert!(!engine.would_overlap(&day, slot("9:30 AM"), 30, &g));
    assert!(engine.would_overlap(&day, slot("9:30 AM"), 45, &g));
    assert_eq!(
        engine.overlapping_slots(slot("9:30 AM"), 45, &g),
        vec![slot("9:45 AM"), slot("10:00 AM")]
    );
}

#[test]
fn test_overlapping_slots_truncated_at_grid_end() {
    let g = grid();
    let engine = OccupancyEngine::new(90);
    assert_eq!(
        engine.overlapping_slots(slot("8:45 PM"), 60, &g),
        vec![slot("9:00 PM")]
    );
    assert!(engine.overlapping_slots(slot("11:00 PM"), 60, &g).is_empty());
}

#[test]
fn test_lookback_widens_for_stored_long_entry() {
    let g = grid();
    // cap says 45 minutes, but stored data holds a 120-minute class
    let engine = OccupancyEngine::new(45);
    assert_eq!(engine.max_span_slots(), 3);
    let day = day_with(&[("6:00 AM", 120)]);

    assert_eq!(engine.classify(&day, slot("7:30 AM"), &g).position(), "middle");
    assert_eq!(engine.classify(&day, slot("7:45 AM"), &g).position(), "end");
    assert!(engine.would_overlap(&day, slot("7:00 AM"), 15, &g));
}

#[test]
fn test_inactive_entry_reserves_but_is_hidden() {
    let g = grid();
    let engine = OccupancyEngine::new(90);
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).expect("date");
    let tomorrow = today.succ_opt().expect("date");

    let mut day = DaySchedule::new();
    day.insert(
        slot("9:00 AM"),
        ClassEntry::new("Flow", "Ana")
            .with_duration(30)
            .with_start_date(Some(tomorrow)),
    );

    assert_eq!(engine.classify(&day, slot("9:00 AM"), &g).position(), "start");
    assert!(engine.classify_active(&day, slot("9:00 AM"), &g, today).is_free());
    assert!(engine.classify_active(&day, slot("9:15 AM"), &g, today).is_free());
    assert_eq!(
        engine
            .classify_active(&day, slot("9:15 AM"), &g, tomorrow)
            .position(),
        "end"
    );
    assert!(engine.would_overlap(&day, slot("9:15 AM"), 15, &g));
}

#[test]
fn test_would_overlap_ignoring_allows_in_place_edit() {
    let g = grid();
    let engine = OccupancyEngine::new(90);
    let day = day_with(&[("9:00 AM", 45), ("10:00 AM", 30)]);

    assert!(engine.would_overlap(&day, slot("9:00 AM"), 60, &g));
    assert!(!engine.would_overlap_ignoring(&day, slot("9:00 AM"), 60, &g, slot("9:00 AM")));
    assert!(engine.would_overlap_ignoring(&day, slot("9:00 AM"), 75, &g, slot("9:00 AM")));
}

#[test]
fn test_would_overlap_matches_add_for_every_slot_and_duration() {
    let g = grid();
    let engine = OccupancyEngine::new(90);

    let mut base = ScheduleStore::new(Room::Movement);
    for (label, duration) in [("6:00 AM", 90), ("9:00 AM", 45), ("12:15 PM", 15), ("8:30 PM", 30)] {
        base.add(
            &engine,
            &g,
            Day::Monday,
            slot(label),
            ClassEntry::new("Flow", "Ana").with_duration(duration),
        )
        .expect("base schedule");
    }
    let day = base.day(Day::Monday).expect("monday").clone();

    let mut collisions = 0;
    for s in g.slots() {
        for duration in (15..=engine.max_duration()).step_by(15) {
            let predicted = engine.would_overlap(&day, *s, duration, &g);

            let mut store = base.clone();
            let result = store.add(
                &engine,
                &g,
                Day::Monday,
                *s,
                ClassEntry::new("Power", "Ben").with_duration(duration),
            );
            assert_eq!(predicted, result.is_err(), "{} for {} minutes", s, duration);
            if let Err(err) = result {
                assert!(matches!(err, AppError::Overlap { .. }), "{} {}", s, duration);
                assert_eq!(store.day(Day::Monday), Some(&day));
                collisions += 1;
            }
        }
    }
    assert!(collisions > 0);
}
