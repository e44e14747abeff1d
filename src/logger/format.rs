//! Log formatting and output with ANSI colors
//!
//! Handles:
//! - Colorized console output with tag and level formatting
//! - Broken pipe handling for piped commands
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

use super::tags::LogTag;

/// Log format widths for alignment
const TAG_WIDTH: usize = 9;
const LEVEL_WIDTH: usize = 7;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, log_type: &str, message: &str) {
    let time = Local::now().format("%H:%M:%S").to_string();

    let tag_str = tag.paint(&format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH));
    let level_str = format_log_type(log_type);

    let line = format!(
        "{} [{}] [{}] {}",
        time.dimmed(),
        tag_str,
        level_str,
        message
    );
    print_stdout_safe(&line);
}

/// Colorize a level string, padded for alignment
fn format_log_type(log_type: &str) -> ColoredString {
    let padded = format!("{:<width$}", log_type, width = LEVEL_WIDTH);
    match log_type {
        "ERROR" => padded.red().bold(),
        "WARNING" => padded.yellow().bold(),
        "INFO" => padded.normal(),
        "DEBUG" => padded.purple(),
        "VERBOSE" => padded.dimmed(),
        _ => padded.normal(),
    }
}

/// Write to stdout, exiting quietly when the pipe is gone
/// (e.g. `dmxbridge | head` closing early)
fn print_stdout_safe(line: &str) {
    let mut out = stdout();
    if let Err(e) = writeln!(out, "{}", line) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
    let _ = out.flush();
}
