/// Centralized argument handling for the DMX bridge
///
/// Consolidates all command-line argument parsing and debug flag checking
/// in one place so modules never touch `env::args()` directly.
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Debug flag checking functions for all modules
/// - Value flags for port, settings file, web root and documents directory
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

/// Global command-line arguments storage
/// Thread-safe singleton that stores arguments for access throughout the application
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
/// Returns a vector clone to avoid holding the mutex lock
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => {
            // Fallback to env::args if mutex is poisoned
            env::args().collect()
        }
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// These functions check for specific debug flags in the command-line arguments
// =============================================================================

/// Webserver and WebSocket hub debug mode
pub fn is_debug_webserver_enabled() -> bool {
    has_arg("--debug-webserver")
}

/// Art-Net sampling debug mode
pub fn is_debug_artnet_enabled() -> bool {
    has_arg("--debug-artnet")
}

/// Settings handling debug mode
pub fn is_debug_settings_enabled() -> bool {
    has_arg("--debug-settings")
}

/// Document listing debug mode
pub fn is_debug_documents_enabled() -> bool {
    has_arg("--debug-documents")
}

/// Check debug flag by module key (used by the logger for tag gating)
pub fn is_debug_enabled_for(key: &str) -> bool {
    has_arg(&format!("--debug-{}", key))
}

/// Verbose mode (shows everything, including verbose-level logs)
pub fn is_verbose_enabled() -> bool {
    has_arg("--verbose")
}

/// Quiet mode (errors only)
pub fn is_quiet_enabled() -> bool {
    has_arg("--quiet")
}

/// Help request
pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

// =============================================================================
// VALUE FLAGS
// =============================================================================

/// Webserver port (--port), defaults to 8080
pub fn get_port() -> u16 {
    get_arg_value("--port")
        .and_then(|v| v.parse().ok())
        .unwrap_or(crate::webserver::DEFAULT_PORT)
}

/// Settings file path (--settings), defaults to settings.json
pub fn get_settings_path() -> PathBuf {
    PathBuf::from(get_arg_value("--settings").unwrap_or_else(|| "settings.json".to_string()))
}

/// Static web UI root (--web-root), defaults to the current directory
pub fn get_web_root() -> PathBuf {
    PathBuf::from(get_arg_value("--web-root").unwrap_or_else(|| ".".to_string()))
}

/// Documents directory served under /pdf (--docs-dir), defaults to the current directory
pub fn get_docs_dir() -> PathBuf {
    PathBuf::from(get_arg_value("--docs-dir").unwrap_or_else(|| ".".to_string()))
}

/// Print usage information
pub fn print_help() {
    println!("dmxbridge - Art-Net to WebSocket live bridge");
    println!();
    println!("USAGE:");
    println!("    dmxbridge [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>          Webserver port (default: 8080)");
    println!("    --settings <FILE>      Settings file path (default: settings.json)");
    println!("    --web-root <DIR>       Static web UI directory (default: .)");
    println!("    --docs-dir <DIR>       PDF documents directory (default: .)");
    println!("    --verbose              Show verbose logs");
    println!("    --quiet                Errors only");
    println!("    --debug-webserver      Webserver/WebSocket debug logs");
    println!("    --debug-artnet         Art-Net sampling debug logs");
    println!("    --debug-settings       Settings debug logs");
    println!("    --debug-documents      Document listing debug logs");
    println!("    -h, --help             Show this help");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_arg_value() {
        set_cmd_args(vec![
            "dmxbridge".to_string(),
            "--port".to_string(),
            "9090".to_string(),
        ]);
        assert_eq!(get_arg_value("--port"), Some("9090".to_string()));
        assert_eq!(get_arg_value("--settings"), None);
        assert_eq!(get_port(), 9090);
        set_cmd_args(vec!["dmxbridge".to_string()]);
    }
}
