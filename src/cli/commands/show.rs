use crate::cli::commands::{open_studio, parse_day, rooms_for};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::occupancy::Occupancy;
use crate::core::studio::Studio;
use crate::errors::AppResult;
use crate::models::day::Day;
use crate::models::room::Room;
use crate::models::time_slot::TimeSlot;
use crate::ui::messages::{header, info};
use crate::utils::table::Table;

fn cell(occ: &Occupancy<'_>) -> String {
    match occ {
        Occupancy::Free => String::new(),
        Occupancy::Start { entry } => {
            let marker = if entry.is_ladies_only() { " *" } else { "" };
            format!(
                "{} ({}) {}m{}",
                entry.class_name, entry.teacher_name, entry.duration_minutes, marker
            )
        }
        Occupancy::Middle { .. } => "  |".to_string(),
        Occupancy::End { .. } => "  '".to_string(),
    }
}

fn lookup(studio: &Studio, room: Room, day: Day, slot: TimeSlot, all: bool) -> Occupancy<'_> {
    if all {
        studio.classify(room, day, slot)
    } else {
        studio.classify_active(room, day, slot)
    }
}

/// Week grid: one column per day, rows only where something is scheduled.
fn print_week(studio: &Studio, room: Room, all: bool) {
    let mut headers = vec!["Time"];
    headers.extend(Day::ALL.iter().map(|d| d.short()));
    let mut table = Table::new(&headers);

    for slot in studio.grid().slots() {
        let cells: Vec<String> = Day::ALL
            .iter()
            .map(|d| cell(&lookup(studio, room, *d, *slot, all)))
            .collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        let mut row = vec![slot.label()];
        row.extend(cells);
        table.add_row(row);
    }

    header(room.title());
    if table.is_empty() {
        info("No classes scheduled.");
    } else {
        print!("{}", table.render());
        println!("(* ladies only, | running, ' last slot)");
    }
}

/// One day in detail.
fn print_day(studio: &Studio, room: Room, day: Day, all: bool) {
    let mut table = Table::new(&["Time", "Class", "Teacher", "Level", "Type", "Duration", "Starts"]);
    let today = studio.today();

    if let Some(schedule) = studio.schedule(room) {
        for (d, slot, entry) in schedule.entries() {
            if d != day || (!all && !entry.is_active_on(today)) {
                continue;
            }
            table.add_row(vec![
                slot.label(),
                entry.class_name.clone(),
                entry.teacher_name.clone(),
                entry.level.clone(),
                entry.session_type.clone(),
                format!("{} min", entry.duration_minutes),
                entry.start_date.map(|d| d.to_string()).unwrap_or_default(),
            ]);
        }
    }

    header(format!("{} · {}", room.title(), day));
    if table.is_empty() {
        info("No classes scheduled.");
    } else {
        print!("{}", table.render());
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { room, day, all } = cmd {
        let rooms = rooms_for(room.as_deref())?;
        let day = day.as_deref().map(parse_day).transpose()?;
        let studio = open_studio(cfg)?;

        for room in rooms {
            match day {
                Some(d) => print_day(&studio, room, d, *all),
                None => print_week(&studio, room, *all),
            }
            println!();
        }
    }

    Ok(())
}
