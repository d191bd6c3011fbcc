use clap::{Parser, Subcommand};

/// Command-line interface definition for rClassbook
/// CLI application to plan studio classes on a weekly grid
#[derive(Parser)]
#[command(
    name = "rclassbook",
    version = env!("CARGO_PKG_VERSION"),
    about = "A studio class-scheduling CLI: weekly 15-minute grid, two rooms, local SQLite or remote storage",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init {
        #[arg(
            long = "no-defaults",
            help = "Start with empty teacher rosters and class catalogs"
        )]
        no_defaults: bool,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Show the weekly schedule of a room
    Show {
        /// Room (movement|reformer, or m|r); both rooms when omitted
        room: Option<String>,

        /// Only this day (e.g. Monday, mon)
        #[arg(long = "day")]
        day: Option<String>,

        /// Also show classes whose start date is still in the future
        #[arg(long = "all")]
        all: bool,
    },

    /// Add a class, or edit the one starting at the same slot
    Add {
        /// Room (movement|reformer)
        room: String,

        /// Day of the week
        day: String,

        /// Start slot (e.g. "9:00 AM" or 09:00)
        time: String,

        #[arg(long = "class", help = "Class type name")]
        class: String,

        #[arg(long = "teacher", help = "Teacher name")]
        teacher: String,

        #[arg(long = "level", help = "Level (defaults to the class type's level)")]
        level: Option<String>,

        #[arg(long = "type", help = "Session type (default: Mixed)")]
        session_type: Option<String>,

        #[arg(long = "duration", help = "Duration in minutes, multiple of 15")]
        duration: Option<u32>,

        #[arg(long = "start", help = "First date the class runs (YYYY-MM-DD)")]
        start_date: Option<String>,
    },

    /// Delete the class starting at a slot
    Del {
        room: String,
        day: String,
        time: String,
    },

    /// Manage a room's teacher roster
    Teacher {
        #[command(subcommand)]
        action: TeacherAction,
    },

    /// Manage a room's class types
    Class {
        #[command(subcommand)]
        action: ClassAction,
    },

    /// Usage statistics for one room or the whole studio
    Stats {
        room: Option<String>,
    },

    /// Push local data to the remote backend
    Sync {
        #[arg(long = "force", help = "Run even if a previous sync completed")]
        force: bool,
    },

    /// Show storage mode and data summary
    Status,

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum TeacherAction {
    /// List teachers with their class counts
    List { room: String },

    Add { room: String, name: String },

    Rename { room: String, old: String, new: String },

    /// Delete a teacher and their classes, or hand the classes to another teacher
    Delete {
        room: String,
        name: String,

        #[arg(long = "reassign", help = "Teacher who takes over the classes")]
        reassign: Option<String>,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ClassAction {
    /// List class types with default level and usage
    List { room: String },

    Add {
        room: String,
        name: String,

        #[arg(long = "level", help = "Default level (default from config)")]
        level: Option<String>,
    },

    Rename { room: String, old: String, new: String },

    /// Delete a class type and every class using it
    Delete {
        room: String,
        name: String,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}
