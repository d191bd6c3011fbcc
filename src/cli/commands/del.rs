use crate::cli::commands::{open_studio, parse_day, parse_room};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { room, day, time } = cmd {
        let room = parse_room(room)?;
        let day = parse_day(day)?;

        let mut studio = open_studio(cfg)?;
        let slot = studio.grid().parse_slot(time)?;

        let removed = studio.remove_class(room, day, slot)?;
        success(format!(
            "Removed '{}' with {} on {} at {} ({})",
            removed.class_name, removed.teacher_name, day, slot, room
        ));
    }

    Ok(())
}
