use crate::cli::commands::{ask_confirmation, open_studio, parse_room};
use crate::cli::parser::{ClassAction, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Class { action } = cmd else {
        return Ok(());
    };

    match action {
        ClassAction::List { room } => {
            let room = parse_room(room)?;
            let studio = open_studio(cfg)?;

            let mut table = Table::new(&["Class", "Default level", "Scheduled"]);
            if let Some(catalog) = studio.catalog(room) {
                for (name, level) in catalog.classes() {
                    table.add_row(vec![
                        name.clone(),
                        level.clone(),
                        studio.class_type_count(room, name).to_string(),
                    ]);
                }
            }

            header(format!("{} class types", room.title()));
            if table.is_empty() {
                info("No class types yet.");
            } else {
                print!("{}", table.render());
            }
        }

        ClassAction::Add { room, name, level } => {
            let room = parse_room(room)?;
            let mut studio = open_studio(cfg)?;
            let name = studio.add_class_type(room, name, level.as_deref())?;
            success(format!("Class type '{}' added to the {} room", name, room));
        }

        ClassAction::Rename { room, old, new } => {
            let room = parse_room(room)?;
            let mut studio = open_studio(cfg)?;
            let changed = studio.rename_class_type(room, old, new)?;
            success(format!(
                "Class type '{}' renamed to '{}' ({} classes updated)",
                old,
                new.trim(),
                changed
            ));
        }

        ClassAction::Delete { room, name, yes } => {
            let room = parse_room(room)?;
            let mut studio = open_studio(cfg)?;

            let count = studio.class_type_count(room, name);
            if count > 0 && !*yes {
                let prompt = format!(
                    "Class type '{}' is used by {} scheduled classes that will be deleted.",
                    name, count
                );
                if !ask_confirmation(&prompt) {
                    info("Operation cancelled.");
                    return Ok(());
                }
            }

            let removed = studio.delete_class_type(room, name)?;
            success(format!(
                "Class type '{}' deleted ({} classes removed)",
                name, removed
            ));
        }
    }

    Ok(())
}
