use crate::cli::commands::open_studio;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sync::push_local_to_remote;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync { force } = cmd {
        let mut studio = open_studio(cfg)?;

        match push_local_to_remote(studio.gateway_mut(), *force)? {
            None => info("Nothing to sync: local data was already pushed (use --force to push again)."),
            Some(report) => {
                let line = format!(
                    "teachers {} pushed / {} skipped, class types {} pushed / {} skipped, classes {} pushed",
                    report.teachers.pushed,
                    report.teachers.skipped,
                    report.class_types.pushed,
                    report.class_types.skipped,
                    report.entries.pushed
                );
                if report.total_failed() == 0 {
                    success(format!("Sync completed: {}", line));
                } else {
                    warning(format!(
                        "Sync completed with {} failures (see `rclassbook log --print`): {}",
                        report.total_failed(),
                        line
                    ));
                }
            }
        }
    }

    Ok(())
}
