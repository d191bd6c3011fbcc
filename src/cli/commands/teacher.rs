use crate::cli::commands::{ask_confirmation, open_studio, parse_room};
use crate::cli::parser::{Commands, TeacherAction};
use crate::config::Config;
use crate::core::studio::TeacherRemoval;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Teacher { action } = cmd else {
        return Ok(());
    };

    match action {
        TeacherAction::List { room } => {
            let room = parse_room(room)?;
            let studio = open_studio(cfg)?;

            let mut table = Table::new(&["Teacher", "Classes"]);
            if let Some(catalog) = studio.catalog(room) {
                for name in catalog.teachers() {
                    table.add_row(vec![
                        name.clone(),
                        studio.teacher_class_count(room, name).to_string(),
                    ]);
                }
            }

            header(format!("{} teachers", room.title()));
            if table.is_empty() {
                info("No teachers yet.");
            } else {
                print!("{}", table.render());
            }
        }

        TeacherAction::Add { room, name } => {
            let room = parse_room(room)?;
            let mut studio = open_studio(cfg)?;
            let name = studio.add_teacher(room, name)?;
            success(format!("Teacher '{}' added to the {} room", name, room));
        }

        TeacherAction::Rename { room, old, new } => {
            let room = parse_room(room)?;
            let mut studio = open_studio(cfg)?;
            let changed = studio.rename_teacher(room, old, new)?;
            success(format!(
                "Teacher '{}' renamed to '{}' ({} classes updated)",
                old,
                new.trim(),
                changed
            ));
        }

        TeacherAction::Delete {
            room,
            name,
            reassign,
            yes,
        } => {
            let room = parse_room(room)?;
            let mut studio = open_studio(cfg)?;

            let count = studio.teacher_class_count(room, name);
            let removal = match reassign {
                Some(r) => TeacherRemoval::ReassignTo(r.trim().to_string()),
                None => TeacherRemoval::DeleteClasses,
            };

            if count > 0 && removal == TeacherRemoval::DeleteClasses && !*yes {
                let prompt = format!(
                    "Teacher '{}' has {} scheduled classes that will be deleted.",
                    name, count
                );
                if !ask_confirmation(&prompt) {
                    info("Operation cancelled.");
                    return Ok(());
                }
            }

            let affected = studio.delete_teacher(room, name, &removal)?;
            match removal {
                TeacherRemoval::DeleteClasses => success(format!(
                    "Teacher '{}' deleted ({} classes removed)",
                    name, affected
                )),
                TeacherRemoval::ReassignTo(r) => success(format!(
                    "Teacher '{}' deleted ({} classes reassigned to '{}')",
                    name, affected, r
                )),
            }
        }
    }

    Ok(())
}
