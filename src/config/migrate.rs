//! Config file upgrades: detect and add keys introduced after the file was
//! written, keeping whatever the operator already set.

use super::Config;
use crate::errors::AppResult;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys a complete config file carries, in file order.
pub const CONFIG_KEYS: [&str; 11] = [
    "database",
    "start_hour",
    "end_hour",
    "max_duration",
    "default_duration",
    "default_level",
    "use_remote",
    "enable_realtime",
    "remote_url",
    "remote_key",
    "remote_timeout_secs",
];

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    let yaml: Value = serde_yaml::from_str(&content)?;
    Ok(yaml.as_mapping().cloned().unwrap_or_default())
}

/// Keys absent from the config file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(path)?;
    Ok(CONFIG_KEYS
        .into_iter()
        .filter(|k| !map.contains_key(Value::String((*k).to_string())))
        .collect())
}

/// Add every missing key with its default value. Returns the keys added.
pub fn add_missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let missing = missing_keys(path)?;
    if missing.is_empty() {
        return Ok(missing);
    }

    let mut map = read_mapping(path)?;
    let defaults = serde_yaml::to_value(Config::default())?;
    let Some(defaults) = defaults.as_mapping() else {
        return Ok(Vec::new());
    };

    for key in &missing {
        let k = Value::String((*key).to_string());
        if let Some(v) = defaults.get(&k) {
            map.insert(k, v.clone());
        }
    }

    fs::write(path, serde_yaml::to_string(&Value::Mapping(map))?)?;
    Ok(missing)
}
