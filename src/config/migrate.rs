//! Keeps an existing YAML config file in line with the current `Config`
//! layout: detects keys added by newer releases and writes their defaults
//! back, leaving the values the user already set untouched.

use super::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Full key set of a default config, in declaration order.
fn reference_mapping(database: &str) -> AppResult<Mapping> {
    let reference = Config::with_database(database.to_string());
    let value = serde_yaml::to_value(&reference)
        .map_err(|e| AppError::Config(format!("Failed to serialize defaults: {}", e)))?;

    match value {
        Value::Mapping(map) => Ok(map),
        _ => Err(AppError::Config("Default configuration is not a mapping".into())),
    }
}

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

    match yaml {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{}: top level must be a mapping",
            path.display()
        ))),
    }
}

fn database_of(map: &Mapping) -> String {
    map.get(Value::String("database".into()))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Config::database_file().to_string_lossy().to_string())
}

/// Keys present in a default config but missing from the file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let current = read_mapping(path)?;
    let reference = reference_mapping(&database_of(&current))?;

    Ok(reference
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add every missing key with its default value. Returns the keys added.
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let mut current = read_mapping(path)?;
    let reference = reference_mapping(&database_of(&current))?;

    let mut added = Vec::new();
    for (key, value) in reference {
        if !current.contains_key(&key) {
            if let Some(name) = key.as_str() {
                added.push(name.to_string());
            }
            current.insert(key, value);
        }
    }

    if added.is_empty() {
        info("Configuration already up to date.");
        return Ok(added);
    }

    let serialized =
        serde_yaml::to_string(&Value::Mapping(current)).map_err(|_| AppError::ConfigSave)?;
    fs::write(path, serialized).map_err(|_| AppError::ConfigSave)?;

    success(format!(
        "Configuration migrated, added: {}",
        added.join(", ")
    ));

    Ok(added)
}
