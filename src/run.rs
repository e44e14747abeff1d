/// Service orchestration
///
/// Wires the components together in dependency order: settings, hub,
/// sampler, webserver. Blocks until an interrupt arrives, then gives the
/// webserver a bounded grace period to finish in-flight writes. The
/// sampler and the hub are simply abandoned at process exit.
use std::time::Duration;

use crate::{
    arguments,
    artnet::UdpFrameSource,
    logger::{self, LogTag},
    sampler,
    settings::{Settings, SharedSettings},
    webserver::{self, state::AppState, ws::hub::{WsHub, OUTBOUND_QUEUE_SIZE}},
};

/// Shutdown grace period for in-flight connections
const SHUTDOWN_GRACE_SECS: u64 = 3;

/// Run the bridge until interrupted
pub async fn run() -> Result<(), String> {
    // 1. Settings: loaded once; a missing or corrupt file keeps defaults
    let settings_path = arguments::get_settings_path();
    let initial = match Settings::load(&settings_path) {
        Ok(loaded) => {
            logger::info(
                LogTag::Settings,
                &format!(
                    "Loaded settings from {} (uni={} ch={})",
                    settings_path.display(),
                    loaded.universe,
                    loaded.channel_from
                ),
            );
            loaded
        }
        Err(e) => {
            logger::warning(
                LogTag::Settings,
                &format!("Could not load settings: {:#} - using defaults", e),
            );
            Settings::default()
        }
    };
    let settings = SharedSettings::new(settings_path, initial);

    // 2. Hub
    let hub = WsHub::new(OUTBOUND_QUEUE_SIZE);

    // 3. Sampler on the Art-Net socket
    let source = UdpFrameSource::bind()
        .await
        .map_err(|e| format!("Failed to bind Art-Net socket: {}", e))?;
    sampler::start(source, settings.clone(), hub.clone());

    // 4. Webserver
    let state = AppState::new(
        settings,
        hub,
        arguments::get_docs_dir(),
        arguments::get_web_root(),
    );
    let port = arguments::get_port();
    let mut server = tokio::spawn(webserver::start_server(state, port));

    // 5. Block until interrupt or early server exit (e.g. bind failure)
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|e| format!("Failed to listen for shutdown signal: {}", e))?;
            logger::info(LogTag::System, "Interrupt received, shutting down...");
        }
        joined = &mut server => {
            return flatten_join(joined);
        }
    }

    // 6. Bounded grace period for in-flight writes
    webserver::shutdown();
    match tokio::time::timeout(Duration::from_secs(SHUTDOWN_GRACE_SECS), &mut server).await {
        Ok(joined) => flatten_join(joined)?,
        Err(_) => {
            logger::warning(
                LogTag::System,
                "Grace period expired, abandoning in-flight connections",
            );
            server.abort();
        }
    }

    Ok(())
}

fn flatten_join(joined: Result<Result<(), String>, tokio::task::JoinError>) -> Result<(), String> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(format!("Webserver task failed: {}", e)),
    }
}
