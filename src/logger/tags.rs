/// Log tags identify which subsystem produced a message
///
/// Each tag maps to a --debug-<key> command-line flag for selective
/// debug output.
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Webserver,
    ArtNet,
    Settings,
    Documents,
}

impl LogTag {
    /// Plain uppercase name (file-safe, no ANSI codes)
    pub fn to_plain_string(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Webserver => "WEBSERVER",
            LogTag::ArtNet => "ARTNET",
            LogTag::Settings => "SETTINGS",
            LogTag::Documents => "DOCS",
        }
    }

    /// Key used for the --debug-<key> flag
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Webserver => "webserver",
            LogTag::ArtNet => "artnet",
            LogTag::Settings => "settings",
            LogTag::Documents => "documents",
        }
    }

    /// Apply the tag's display color to a string
    pub fn paint(&self, text: &str) -> ColoredString {
        match self {
            LogTag::System => text.green().bold(),
            LogTag::Webserver => text.cyan().bold(),
            LogTag::ArtNet => text.magenta().bold(),
            LogTag::Settings => text.yellow().bold(),
            LogTag::Documents => text.blue().bold(),
        }
    }
}
