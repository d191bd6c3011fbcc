use crate::cli::commands::{open_studio, parse_day, parse_room};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::schedule::PutOutcome;
use crate::core::studio::ClassRequest;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        room,
        day,
        time,
        class,
        teacher,
        level,
        session_type,
        duration,
        start_date,
    } = cmd
    {
        let room = parse_room(room)?;
        let day = parse_day(day)?;

        let mut studio = open_studio(cfg)?;
        let slot = studio.grid().parse_slot(time)?;

        let mut request = ClassRequest::new(class, teacher);
        if let Some(l) = level {
            request = request.level(l);
        }
        if let Some(t) = session_type {
            request = request.session_type(t);
        }
        if let Some(d) = duration {
            request = request.duration(*d);
        }
        if let Some(s) = start_date {
            request = request.start_date(date::parse_date(s)?);
        }

        let verb = match studio.save_class(room, day, slot, &request)? {
            PutOutcome::Added => "added",
            PutOutcome::Updated => "updated",
        };
        success(format!(
            "Class '{}' with {} {} on {} at {} ({})",
            request.class_name, request.teacher_name, verb, day, slot, room
        ));
    }

    Ok(())
}
