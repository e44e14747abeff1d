/// Inbound client command handling
///
/// Interprets the text frames a client sends over its WebSocket:
/// - A JSON object replaces the shared settings wholesale and persists them
/// - "set" replies with the settings currently in effect
/// - "pdf" replies with the document listing
/// - Anything else is ignored
///
/// Replies go only to the requesting connection, through its outbound
/// queue. A reply to a connection that is gone or hopelessly backed up is
/// dropped; broadcast eviction deals with the slow consumer.
use serde_json::json;

use crate::{
    documents,
    logger::{self, LogTag},
    settings::Settings,
    webserver::state::AppState,
};

use super::hub::ConnectionId;

/// Handle one inbound text frame
pub async fn handle_client_message(text: &str, conn_id: ConnectionId, state: &AppState) {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        apply_settings_update(trimmed, state).await;
        return;
    }

    match trimmed {
        "set" => {
            // Snapshot at reply time, never a cached copy
            let snapshot = state.settings.snapshot().await;
            match serde_json::to_string(&snapshot) {
                Ok(reply) => send_reply(conn_id, reply, state).await,
                Err(e) => {
                    logger::error(
                        LogTag::Settings,
                        &format!("Failed to serialize settings reply: {}", e),
                    );
                }
            }
        }
        "pdf" => {
            let payload = match documents::list_documents(&state.docs_dir) {
                Ok(names) => json!({ "pdfs": names }),
                Err(e) => {
                    logger::warning(
                        LogTag::Documents,
                        &format!("Document listing failed: {:#}", e),
                    );
                    json!({ "error": [e.to_string()] })
                }
            };
            send_reply(conn_id, payload.to_string(), state).await;
        }
        // Unknown commands are ignored without error
        _ => {}
    }
}

/// Parse and apply a full settings replacement
async fn apply_settings_update(text: &str, state: &AppState) {
    let next: Settings = match serde_json::from_str(text) {
        Ok(next) => next,
        Err(e) => {
            // Malformed input never touches the current settings
            logger::warning(
                LogTag::Settings,
                &format!("Rejected malformed settings update: {}", e),
            );
            return;
        }
    };

    logger::info(
        LogTag::Settings,
        &format!(
            "Settings replaced: uni={} ch={} filter={:?} file={:?}",
            next.universe, next.channel_from, next.filter, next.file
        ),
    );

    if let Err(e) = state.settings.replace(next).await {
        // The new value stays in effect in memory; only persistence failed
        logger::error(LogTag::Settings, &format!("Failed to persist settings: {:#}", e));
    }
}

/// Queue a reply for one connection
async fn send_reply(conn_id: ConnectionId, reply: String, state: &AppState) {
    if !state.hub.send_to(conn_id, reply).await {
        logger::debug(
            LogTag::Webserver,
            &format!("Connection {}: reply dropped (gone or backed up)", conn_id),
        );
    }
}
