use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::defaults;
use crate::db::kv::SqliteStorage;
use crate::errors::AppResult;
use crate::persistence::LocalStorage;
use crate::persistence::local::LocalBackend;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
///  - starter teachers and class types for rooms that have none yet
pub fn handle(cli: &Cli) -> AppResult<()> {
    let no_defaults = matches!(cli.command, Commands::Init { no_defaults: true });

    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing rClassbook…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let mut storage = SqliteStorage::open(&db_path)?;

    if let Err(e) = storage.log(
        "init",
        "database",
        &format!("Database initialized at {}", &db_path),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    if !no_defaults {
        let mut local = LocalBackend::new(Box::new(storage));
        for room in defaults::seed_missing(&mut local)? {
            info(format!(
                "{}: {} teachers and {} class types added",
                room.title(),
                defaults::teachers(room).len(),
                defaults::classes(room).len()
            ));
        }
    }

    success(format!("Database initialized at {}", &db_path));
    Ok(())
}
