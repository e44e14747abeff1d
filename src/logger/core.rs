/// Core logging implementation with automatic filtering
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Warning/Info are checked against the minimum level threshold
/// 3. Debug level requires the --debug-<module> flag for that tag
/// 4. Verbose level requires the --verbose flag
use crate::arguments;

use super::levels::LogLevel;
use super::tags::LogTag;

/// Minimum level derived from command-line flags
fn min_level() -> LogLevel {
    if arguments::is_verbose_enabled() {
        LogLevel::Verbose
    } else if arguments::is_quiet_enabled() {
        LogLevel::Error
    } else {
        LogLevel::Info
    }
}

/// Check if a log message should be displayed
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    match level {
        // Rule 1: Errors always log (critical)
        LogLevel::Error => true,

        // Rule 2: Check minimum level threshold
        LogLevel::Warning | LogLevel::Info => level <= min_level(),

        // Rule 3: Debug requires debug mode for that specific tag
        LogLevel::Debug => {
            arguments::is_verbose_enabled() || arguments::is_debug_enabled_for(tag.to_debug_key())
        }

        // Rule 4: Verbose requires the explicit --verbose flag
        LogLevel::Verbose => arguments::is_verbose_enabled(),
    }
}

/// Internal logging function with automatic filtering
pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level.as_str(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_always_log() {
        assert!(should_log(&LogTag::System, LogLevel::Error));
    }

    #[test]
    fn test_debug_gated_by_flag() {
        // No --debug-artnet flag set by default
        assert!(!should_log(&LogTag::ArtNet, LogLevel::Debug));
    }
}
