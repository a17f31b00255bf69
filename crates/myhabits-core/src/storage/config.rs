//! TOML-based application configuration.
//!
//! Stores:
//! - Storage location (database file name)
//! - Defaults applied to newly created habits
//! - Log level used when `RUST_LOG` is unset
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use super::database::DEFAULT_DB_FILE;
use crate::error::{ConfigError, Result};
use crate::habit::{Habit, RepeatType, ALL_DAYS, DEFAULT_COLOR};

const CONFIG_FILE: &str = "config.toml";

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

/// Defaults for habits created without explicit options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default = "default_color")]
    pub color: i32,
    #[serde(default)]
    pub repeat_type: RepeatType,
    #[serde(default = "default_selected_days")]
    pub selected_days: Vec<u8>,
    #[serde(default = "default_monthly_date")]
    pub monthly_date: u8,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. "info" or "myhabits_core=debug".
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_db_file() -> String {
    DEFAULT_DB_FILE.to_string()
}
fn default_color() -> i32 {
    DEFAULT_COLOR
}
fn default_selected_days() -> Vec<u8> {
    ALL_DAYS.to_vec()
}
// The create form preselects the 18th for monthly habits.
fn default_monthly_date() -> u8 {
    18
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            repeat_type: RepeatType::Daily,
            selected_days: default_selected_days(),
            monthly_date: default_monthly_date(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as integer")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check that habit defaults describe a schedule that can come due.
    ///
    /// # Errors
    ///
    /// `defaults.monthly_date` must be in `1..=31` and every entry of
    /// `defaults.selected_days` must be an ISO weekday in `1..=7`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let defaults = &self.defaults;
        if !(1..=31).contains(&defaults.monthly_date) {
            return Err(ConfigError::InvalidValue {
                key: "defaults.monthly_date".to_string(),
                message: format!("{} is not a day of the month (1-31)", defaults.monthly_date),
            });
        }
        if let Some(day) = defaults.selected_days.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(ConfigError::InvalidValue {
                key: "defaults.selected_days".to_string(),
                message: format!("{day} is not a weekday (1-7)"),
            });
        }
        Ok(())
    }

    /// A new habit titled `title` carrying the configured defaults.
    pub fn new_habit(&self, title: impl Into<String>) -> Habit {
        Habit {
            color: self.defaults.color,
            repeat_type: self.defaults.repeat_type,
            selected_days: self.defaults.selected_days.clone(),
            monthly_date: self.defaults.monthly_date,
            ..Habit::new(title)
        }
    }
}
