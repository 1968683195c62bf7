/// Configuration loading
use std::path::Path;

use super::schemas::Config;
use crate::errors::{QueueError, QueueResult};
use crate::logger::{self, LogTag};

/// Load the configuration from a TOML file
///
/// A missing file yields the defaults. A file that exists but fails to parse or
/// validate is an error; the process should not start on a half-read config.
pub fn load_config_from_path(path: &Path) -> QueueResult<Config> {
    let config = if path.exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            QueueError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let parsed = toml::from_str::<Config>(&contents).map_err(|e| {
            QueueError::Config(format!("Failed to parse config file '{}': {}", path.display(), e))
        })?;

        logger::debug(LogTag::Config, &format!("Loaded config from {}", path.display()));
        parsed
    } else {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path.display()),
        );
        Config::default()
    };

    config.validate()?;
    Ok(config)
}
