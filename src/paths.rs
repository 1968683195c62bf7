//! Centralized path resolution
//!
//! ```text
//! <base>/
//! ├── data/
//! │   └── config.toml
//! └── logs/
//!     └── carequeue_<date>.log
//! ```
//!
//! `<base>` is `$CAREQUEUE_HOME` when set, otherwise the platform data directory
//! (`~/.local/share/carequeue` on Linux, `~/Library/Application Support/carequeue`
//! on macOS, `%LOCALAPPDATA%\carequeue` on Windows), falling back to the working
//! directory.

use once_cell::sync::Lazy;
use std::path::PathBuf;

const APP_DIR: &str = "carequeue";
const HOME_ENV: &str = "CAREQUEUE_HOME";

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }

    if let Some(dir) = dirs::data_local_dir() {
        return dir.join(APP_DIR);
    }

    PathBuf::from(".")
}

pub fn get_base_directory() -> PathBuf {
    BASE_DIRECTORY.clone()
}

pub fn get_data_directory() -> PathBuf {
    get_base_directory().join("data")
}

pub fn get_logs_directory() -> PathBuf {
    get_base_directory().join("logs")
}

/// Default location of the TOML config file
pub fn get_config_path() -> PathBuf {
    get_data_directory().join("config.toml")
}

/// Create the data and logs directories if missing
pub fn ensure_all_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_data_directory())?;
    std::fs::create_dir_all(get_logs_directory())?;
    Ok(())
}
