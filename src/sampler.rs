/// Art-Net sampling loop
///
/// Bridges the frame source to the WebSocket hub: polls at a fixed cadence,
/// filters frames against the current settings and broadcasts the selected
/// channel window to every connected client. Errors never stop the loop;
/// the source is expected to recover on its own.
use serde::Serialize;
use std::sync::Arc;
use tokio::time::{interval, Duration};

use crate::{
    arguments::is_debug_artnet_enabled,
    artnet::{Frame, FrameSource},
    logger::{self, LogTag},
    settings::SharedSettings,
    webserver::ws::hub::WsHub,
};

/// Number of consecutive channels reported per sample
pub const CHANNEL_WINDOW: usize = 3;

/// Poll cadence: three samples per second
const POLL_INTERVAL_MS: u64 = 333;

/// Broadcast payload sent to every client
#[derive(Debug, Serialize)]
struct ChannelUpdate {
    ch: [u8; CHANNEL_WINDOW],
}

/// Spawn the sampling loop
pub fn start(source: impl FrameSource + 'static, settings: SharedSettings, hub: Arc<WsHub>) {
    tokio::spawn(run(source, settings, hub));
    logger::info(LogTag::ArtNet, "Sampler started (3 samples/sec)");
}

/// Run the sampling loop forever
pub async fn run(mut source: impl FrameSource, settings: SharedSettings, hub: Arc<WsHub>) {
    let mut ticker = interval(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        ticker.tick().await;

        let frame = match source.poll_frame().await {
            Ok(frame) => frame,
            Err(e) if e.is_transient() => {
                if is_debug_artnet_enabled() {
                    logger::debug(LogTag::ArtNet, &format!("Poll skipped: {}", e));
                }
                continue;
            }
            Err(e) => {
                logger::warning(LogTag::ArtNet, &format!("Frame decode failed: {}", e));
                continue;
            }
        };

        // One snapshot per frame: the filter and the window offset always
        // come from the same settings record.
        let snapshot = settings.snapshot().await;

        if !frame.has_data || frame.universe != snapshot.universe {
            continue;
        }

        let window = match channel_window(&frame, snapshot.channel_from) {
            Some(window) => window,
            None => {
                if is_debug_artnet_enabled() {
                    logger::debug(
                        LogTag::ArtNet,
                        &format!(
                            "Frame rejected: {} channels, window of {} at offset {}",
                            frame.channels.len(),
                            CHANNEL_WINDOW,
                            snapshot.channel_from
                        ),
                    );
                }
                continue;
            }
        };

        match format_channel_message(window) {
            Ok(message) => hub.broadcast(message).await,
            Err(e) => {
                logger::error(LogTag::ArtNet, &format!("Failed to format sample: {}", e));
            }
        }
    }
}

/// Extract the reported window from a frame
///
/// `channel_from` is 1-based. Frames too short to hold the full window
/// are rejected, never read out of range or padded.
pub fn channel_window(frame: &Frame, channel_from: i64) -> Option<[u8; CHANNEL_WINDOW]> {
    if channel_from < 1 {
        return None;
    }

    let start = (channel_from - 1) as usize;
    let slice = frame.channels.get(start..start + CHANNEL_WINDOW)?;

    let mut window = [0u8; CHANNEL_WINDOW];
    window.copy_from_slice(slice);
    Some(window)
}

/// Serialize a window as the broadcast wire message
pub fn format_channel_message(window: [u8; CHANNEL_WINDOW]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ChannelUpdate { ch: window })
}
