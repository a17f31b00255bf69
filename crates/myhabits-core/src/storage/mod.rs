mod config;
pub mod database;
pub mod habit_store;
pub mod kv;
pub mod records;

pub use config::{Config, DefaultsConfig, LogConfig, StorageConfig};
pub use database::Database;
pub use habit_store::HabitStore;
pub use kv::{KvStore, MemoryKv};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the data directory, creating it if needed.
///
/// `MYHABITS_HOME` wins when set. Otherwise `~/.config/myhabits[-dev]/`,
/// where `MYHABITS_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("MYHABITS_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| ConfigError::DataDir("home directory not found".into()))?
                .join(".config");

            let env = std::env::var("MYHABITS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("myhabits-dev")
            } else {
                base_dir.join("myhabits")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
