use crate::cli::commands::open_studio;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::room::Room;
use crate::utils::colors::{color_for_mode, paint};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status = cmd {
        let studio = open_studio(cfg)?;
        let mode = studio.gateway_mode();

        println!(
            "Storage   : {}",
            paint(color_for_mode(studio.gateway().is_remote()), &mode.to_string())
        );
        println!("Database  : {}", cfg.database);
        println!(
            "Grid      : {} to {} ({} slots)",
            studio.grid().slots().first().map(|s| s.label()).unwrap_or_default(),
            studio.grid().slots().last().map(|s| s.label()).unwrap_or_default(),
            studio.grid().len()
        );
        println!("Max class : {} min", cfg.max_duration);
        println!(
            "Realtime  : {}",
            if studio.gateway().is_remote() && cfg.enable_realtime {
                "enabled"
            } else {
                "off"
            }
        );

        for room in Room::ALL {
            let teachers = studio.catalog(room).map(|c| c.teachers().len()).unwrap_or(0);
            let classes = studio.catalog(room).map(|c| c.classes().len()).unwrap_or(0);
            let entries = studio.schedule(room).map(|s| s.len()).unwrap_or(0);
            println!(
                "{:<14}: {} teachers, {} class types, {} scheduled classes",
                room.title(),
                teachers,
                classes,
                entries
            );
        }
    }

    Ok(())
}
