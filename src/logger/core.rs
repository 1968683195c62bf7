/// Core logging implementation with automatic filtering
use super::config::{get_logger_config, is_debug_enabled_for_tag, is_verbose_enabled_for_tag};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against minimum log level threshold
/// 3. Debug level requires --debug-<tag> for that tag
/// 4. Verbose level requires --verbose OR --verbose-<tag>
/// 5. If enabled_tags is non-empty, tag must be in the set
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let config = get_logger_config();

    if level == LogLevel::Error {
        return true;
    }

    if level == LogLevel::Verbose {
        return config.min_level == LogLevel::Verbose || is_verbose_enabled_for_tag(tag);
    }

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug {
        return is_debug_enabled_for_tag(tag);
    }

    if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(&tag.to_debug_key()) {
        return false;
    }

    true
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::{config_from_args, set_logger_config};

    #[test]
    fn test_verbose_tag_only_opens_its_own_tag() {
        let args: Vec<String> = ["carequeue", "--verbose-store"].iter().map(|s| s.to_string()).collect();
        set_logger_config(config_from_args(&args));

        assert!(should_log(&LogTag::Store, LogLevel::Verbose));
        assert!(should_log(&LogTag::Store, LogLevel::Debug));
        assert!(!should_log(&LogTag::Api, LogLevel::Verbose));
        assert!(!should_log(&LogTag::Api, LogLevel::Debug));
        assert!(should_log(&LogTag::Api, LogLevel::Info));

        set_logger_config(config_from_args(&["carequeue".to_string()]));
    }
}
