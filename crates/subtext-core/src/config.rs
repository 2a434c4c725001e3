use crate::error::Result;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DB_FILENAME: &str = "subtext.json";

/// Get the subtext configuration directory
pub fn get_config_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".subtext"))
        .unwrap_or_else(|_| PathBuf::from(".subtext"))
}

/// Ensure the configuration directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }
    Ok(config_dir)
}

/// Get the path to the replacement database file
pub fn get_db_file_path() -> PathBuf {
    get_config_dir().join(DB_FILENAME)
}
