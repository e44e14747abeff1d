/// Shared application state for the webserver
///
/// Everything route handlers and the WebSocket layer need: the shared
/// settings, the hub, and the directories being served. Constructed once
/// at startup and cloned into every handler - there are no ambient
/// globals behind this.
use std::path::PathBuf;
use std::sync::Arc;

use crate::settings::SharedSettings;
use crate::webserver::ws::hub::WsHub;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared bridge settings
    pub settings: SharedSettings,

    /// Central WebSocket hub
    pub hub: Arc<WsHub>,

    /// Directory with the PDF documents served under /pdf
    pub docs_dir: Arc<PathBuf>,

    /// Static web UI root
    pub web_root: Arc<PathBuf>,

    /// Server startup time
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        settings: SharedSettings,
        hub: Arc<WsHub>,
        docs_dir: PathBuf,
        web_root: PathBuf,
    ) -> Self {
        Self {
            settings,
            hub,
            docs_dir: Arc::new(docs_dir),
            web_root: Arc::new(web_root),
            startup_time: chrono::Utc::now(),
        }
    }
}
