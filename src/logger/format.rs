//! Log formatting and output with ANSI colors and text wrapping
//!
//! Handles:
//! - Colorized console output with tag and level formatting
//! - Text wrapping at word boundaries
//! - Dual output (console + file)

use super::file::write_to_file;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 7;
const BRACKET_SPACE_WIDTH: usize = 3;
const TOTAL_PREFIX_WIDTH: usize = TAG_WIDTH + LEVEL_WIDTH + BRACKET_SPACE_WIDTH * 2;

/// Maximum line length before wrapping
const MAX_LINE_LENGTH: usize = 145;

pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let now = Local::now();
    let time = now.format("%H:%M:%S").to_string();

    let base_line = format!(
        "{} [{}] [{}] ",
        time.dimmed(),
        format_tag(&tag),
        format_level(level)
    );

    let prefix_len = time.len() + 1 + TOTAL_PREFIX_WIDTH;
    let available_space = MAX_LINE_LENGTH.saturating_sub(prefix_len).max(50);
    let chunks = wrap_text(message, available_space);

    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let tag_clean = tag.to_plain_string();
    let continuation_prefix = " ".repeat(prefix_len);

    for (i, chunk) in chunks.iter().enumerate() {
        let console_line = if i == 0 {
            format!("{}{}", base_line, chunk)
        } else {
            format!("{}{}", continuation_prefix, chunk)
        };
        print_stdout_safe(&console_line);

        write_to_file(&format!("{} [{}] [{}] {}", timestamp, tag_clean, level.as_str(), chunk));
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Webserver => label.bright_cyan().bold(),
        LogTag::Streams => label.bright_magenta().bold(),
        LogTag::Store => label.bright_green().bold(),
        LogTag::Api => label.bright_blue().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.bright_yellow().bold(),
        LogLevel::Info => label.white().bold(),
        LogLevel::Debug => label.bright_black(),
        LogLevel::Verbose => label.dimmed(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    let mut out = stdout();
    if let Err(e) = writeln!(out, "{}", message) {
        if e.kind() == ErrorKind::BrokenPipe {
            return;
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
    let _ = out.flush();
}

/// Wrap text at word boundaries, respecting existing newlines
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for line in text.split('\n') {
        if line.chars().count() <= max_width {
            result.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(max_width) {
                    result.push(chunk.iter().collect());
                }
            } else if current.is_empty() {
                current = word.to_string();
            } else if current_len + word_len + 1 <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_keeps_short_lines() {
        assert_eq!(wrap_text("stream opened", 50), vec!["stream opened"]);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        let wrapped = wrap_text("patient 3892 moved to pharmacy", 12);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 12));
        assert_eq!(wrapped.join(" "), "patient 3892 moved to pharmacy");
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let wrapped = wrap_text("abcdefghij", 4);
        assert_eq!(wrapped, vec!["abcd", "efgh", "ij"]);
    }
}
