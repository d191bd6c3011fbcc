use crate::cli::commands::{open_studio, parse_room};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::table::Table;
use std::collections::BTreeMap;

fn print_counts(title: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    let mut table = Table::new(&[title, "Classes"]);
    for (name, n) in counts {
        table.add_row(vec![name.clone(), n.to_string()]);
    }
    print!("{}", table.render());
    println!();
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { room } = cmd {
        let scope = room.as_deref().map(parse_room).transpose()?;
        let studio = open_studio(cfg)?;
        let stats = studio.stats(scope);

        header(match scope {
            Some(r) => format!("Statistics · {}", r.title()),
            None => "Statistics · whole studio".to_string(),
        });
        println!("Total classes   : {}", stats.total_classes);
        println!("Active teachers : {}", stats.active_teachers);
        println!("Class types     : {}", stats.class_types);
        println!();

        if !stats.teacher_load.is_empty() {
            let mut table = Table::new(&["#", "Teacher", "Classes"]);
            for (i, (name, n)) in stats.teacher_load.iter().enumerate() {
                table.add_row(vec![(i + 1).to_string(), name.clone(), n.to_string()]);
            }
            print!("{}", table.render());
            println!();
        }

        let mut days = Table::new(&["Day", "Classes"]);
        for (day, n) in &stats.by_day {
            days.add_row(vec![day.to_string(), n.to_string()]);
        }
        print!("{}", days.render());
        println!();

        if scope.is_none() {
            let by_room: BTreeMap<String, usize> = stats
                .by_room
                .iter()
                .map(|(r, n)| (r.title().to_string(), *n))
                .collect();
            print_counts("Room", &by_room);
        }
        print_counts("Class type", &stats.by_class);
        print_counts("Session type", &stats.by_session_type);
        print_counts("Level", &stats.by_level);
    }

    Ok(())
}
