/// Logger configuration derived from command-line flags
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Highest level that passes the threshold check
    pub min_level: LogLevel,
    /// Tags with debug output enabled
    pub debug_tags: HashSet<String>,
    /// Tags with verbose output enabled
    pub verbose_tags: HashSet<String>,
    /// If non-empty, only these tags are shown (errors always pass)
    pub enabled_tags: HashSet<String>,
    /// Mirror log lines into the log file
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            file_logging: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(cfg) => cfg.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut cfg) => {
            *cfg = config;
        }
        Err(poisoned) => {
            *poisoned.into_inner() = config;
        }
    }
}

/// Build a logger configuration from an argument list
pub fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        } else if arg == "--no-log-file" {
            config.file_logging = false;
        } else if let Some(key) = arg.strip_prefix("--debug-") {
            if LogTag::from_debug_key(key).is_some() {
                config.debug_tags.insert(key.to_string());
                if config.min_level < LogLevel::Debug {
                    config.min_level = LogLevel::Debug;
                }
            }
        } else if let Some(key) = arg.strip_prefix("--verbose-") {
            if LogTag::from_debug_key(key).is_some() {
                config.verbose_tags.insert(key.to_string());
                if config.min_level < LogLevel::Debug {
                    config.min_level = LogLevel::Debug;
                }
            }
        } else if let Some(list) = arg.strip_prefix("--log-tags=") {
            config.enabled_tags = list
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    config
}

/// Scan the process arguments and install the resulting configuration
pub fn init_from_args() {
    set_logger_config(config_from_args(&get_cmd_args()));
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    let key = tag.to_debug_key();
    config.debug_tags.contains(&key) || config.verbose_tags.contains(&key)
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().verbose_tags.contains(&tag.to_debug_key())
}
