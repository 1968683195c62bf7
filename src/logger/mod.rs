//! Structured logging for the queue tracker
//!
//! This module provides a small logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-subsystem debug control via --debug-<tag> flags
//! - Dual output: colored console + daily log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use carequeue::logger::{self, LogTag};
//!
//! logger::error(LogTag::Webserver, "Failed to bind listener");
//! logger::warning(LogTag::Config, "Config file not found, using defaults");
//! logger::info(LogTag::Store, "Patient 3892 registered");
//! logger::debug(LogTag::Streams, "Stream opened"); // Only with --debug-streams
//! logger::verbose(LogTag::Api, "Raw request body: ..."); // Only with --verbose
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{
    config_from_args, get_logger_config, init_from_args, set_logger_config, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Call once at startup, before any logging occurs. Parses the debug flags and
/// opens today's log file.
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when the `--debug-<tag>` flag for this tag is present.
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose or --verbose-<tag>)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Whether debug output is enabled for a tag
///
/// Lets callers skip building expensive debug messages.
pub fn is_debug_enabled(tag: LogTag) -> bool {
    core::should_log(&tag, LogLevel::Debug)
}

/// Force flush pending log file writes
pub fn flush() {
    file::flush_file_logging();
}
