use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

/// Placeholder values shipped in fresh config files; never valid credentials.
pub const PLACEHOLDER_URL: &str = "YOUR_REMOTE_PROJECT_URL";
pub const PLACEHOLDER_KEY: &str = "YOUR_REMOTE_ANON_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default = "default_max_duration")]
    pub max_duration: u32,
    #[serde(default = "default_default_duration")]
    pub default_duration: u32,
    #[serde(default = "default_level")]
    pub default_level: String,
    #[serde(default)]
    pub use_remote: bool,
    #[serde(default = "default_true")]
    pub enable_realtime: bool,
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
    #[serde(default = "default_remote_key")]
    pub remote_key: String,
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_secs: u64,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_start_hour() -> u32 {
    5
}
fn default_end_hour() -> u32 {
    21
}
fn default_max_duration() -> u32 {
    90
}
fn default_default_duration() -> u32 {
    45
}
fn default_level() -> String {
    "Intermediate".to_string()
}
fn default_true() -> bool {
    true
}
fn default_remote_url() -> String {
    PLACEHOLDER_URL.to_string()
}
fn default_remote_key() -> String {
    PLACEHOLDER_KEY.to_string()
}
fn default_remote_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            max_duration: default_max_duration(),
            default_duration: default_default_duration(),
            default_level: default_level(),
            use_remote: false,
            enable_realtime: default_true(),
            remote_url: default_remote_url(),
            remote_key: default_remote_key(),
            remote_timeout_secs: default_remote_timeout(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rclassbook")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rclassbook")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rclassbook.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rclassbook.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the scheduling core cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if self.start_hour > self.end_hour || self.end_hour > 23 {
            return Err(AppError::Config(format!(
                "start_hour ({}) and end_hour ({}) must satisfy start_hour <= end_hour <= 23",
                self.start_hour, self.end_hour
            )));
        }
        if self.max_duration == 0 || self.max_duration % 15 != 0 {
            return Err(AppError::Config(format!(
                "max_duration must be a positive multiple of 15 (got {})",
                self.max_duration
            )));
        }
        if self.default_duration == 0
            || self.default_duration % 15 != 0
            || self.default_duration > self.max_duration
        {
            return Err(AppError::Config(format!(
                "default_duration must be a positive multiple of 15 not above max_duration (got {})",
                self.default_duration
            )));
        }
        Ok(())
    }

    /// Both values present and not the shipped placeholders.
    pub fn has_valid_credentials(&self) -> bool {
        let url = self.remote_url.trim();
        let key = self.remote_key.trim();
        !url.is_empty() && !key.is_empty() && url != PLACEHOLDER_URL && key != PLACEHOLDER_KEY
    }

    /// Initialize configuration and database directory; returns the database path.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(db_path)
    }
}
