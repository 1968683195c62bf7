//! Daily log file persistence
//!
//! Lines are appended to `<logs dir>/carequeue_<YYYY-MM-DD>.log`. A failure to
//! open the file disables file logging for the rest of the process; console
//! output is unaffected.

use chrono::Local;
use once_cell::sync::Lazy;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use super::config::get_logger_config;
use crate::paths;

struct LogFile {
    date: String,
    writer: BufWriter<File>,
}

static LOG_FILE: Lazy<Mutex<Option<LogFile>>> = Lazy::new(|| Mutex::new(None));

fn log_file_path(date: &str) -> PathBuf {
    paths::get_logs_directory().join(format!("carequeue_{}.log", date))
}

fn open_log_file(date: &str) -> Option<LogFile> {
    let path = log_file_path(date);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
    Some(LogFile {
        date: date.to_string(),
        writer: BufWriter::new(file),
    })
}

pub fn init_file_logging() {
    if !get_logger_config().file_logging {
        return;
    }
    let date = Local::now().format("%Y-%m-%d").to_string();
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = open_log_file(&date);
    }
}

pub fn write_to_file(line: &str) {
    if !get_logger_config().file_logging {
        return;
    }
    let Ok(mut guard) = LOG_FILE.lock() else {
        return;
    };

    // Roll over at midnight
    let today = Local::now().format("%Y-%m-%d").to_string();
    let needs_rotation = guard.as_ref().map(|f| f.date != today).unwrap_or(false);
    if needs_rotation {
        if let Some(mut old) = guard.take() {
            let _ = old.writer.flush();
        }
        *guard = open_log_file(&today);
    }

    if let Some(log_file) = guard.as_mut() {
        let _ = writeln!(log_file.writer, "{}", line);
    }
}

pub fn flush_file_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(log_file) = guard.as_mut() {
            let _ = log_file.writer.flush();
        }
    }
}
