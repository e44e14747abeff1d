/// WebSocket connection handling
///
/// Each accepted connection gets:
/// - A reader loop (this task) interpreting inbound client commands
/// - A writer task owning the outbound queue and the keepalive timer
///
/// The writer is the connection's actor: it drains the hub-fed queue into
/// the socket and pings on a fixed interval. When the queue closes (the
/// hub unregistered or evicted the connection) it sends a close frame and
/// terminates. Open → draining → closed, never back.
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{Sink, SinkExt, StreamExt};
use tokio::time::{interval, Duration};

use crate::{
    arguments::is_debug_webserver_enabled,
    logger::{self, LogTag},
    webserver::state::AppState,
};

use super::{commands, hub::OutboundReceiver};

/// Keepalive ping cadence
pub const PING_INTERVAL_SECS: u64 = 10;

/// Upgrade handler for the /ws route
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one WebSocket connection until it closes
pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let (conn_id, outbound_rx) = state.hub.register().await;

    let (ws_tx, mut ws_rx) = socket.split();
    let writer = tokio::spawn(run_writer(ws_tx, outbound_rx));

    // Reader loop: inbound client commands
    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                commands::handle_client_message(&text, conn_id, &state).await;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                if is_debug_webserver_enabled() {
                    logger::debug(
                        LogTag::Webserver,
                        &format!("Connection {}: client closed", conn_id),
                    );
                }
                break;
            }
            // Binary frames are ignored
            Ok(Message::Binary(_)) => {}
            Err(e) => {
                logger::warning(
                    LogTag::Webserver,
                    &format!("Connection {}: websocket error: {}", conn_id, e),
                );
                break;
            }
        }
    }

    // Removing the registry entry closes the queue; the writer drains what
    // is left, emits a close frame and exits. Both socket halves are
    // released when the tasks return, no matter which side failed first.
    state.hub.unregister(conn_id).await;
    let _ = writer.await;
}

/// Writer task: the connection's actor
///
/// Generic over the sink so tests can capture the emitted frames.
pub(crate) async fn run_writer<S>(mut ws_tx: S, mut outbound_rx: OutboundReceiver)
where
    S: Sink<Message> + Unpin,
{
    let mut ping = interval(Duration::from_secs(PING_INTERVAL_SECS));
    // The first tick completes immediately; consume it so pings start one
    // interval after connect.
    ping.tick().await;

    loop {
        tokio::select! {
            maybe = outbound_rx.recv() => match maybe {
                Some(text) => {
                    if ws_tx.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                None => {
                    // Queue closed: say goodbye and stop
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            },
            _ = ping.tick() => {
                if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_writer_drains_then_closes() {
        let (queue_tx, queue_rx) = mpsc::channel::<String>(8);
        let (sink_tx, mut sink_rx) = futures::channel::mpsc::unbounded::<Message>();

        let writer = tokio::spawn(run_writer(sink_tx, queue_rx));

        queue_tx.send("hello".to_string()).await.unwrap();
        queue_tx.send("world".to_string()).await.unwrap();
        drop(queue_tx);

        // Writer must terminate on its own once the queue closes
        tokio::time::timeout(Duration::from_secs(2), writer)
            .await
            .expect("writer did not terminate")
            .unwrap();

        assert_eq!(
            sink_rx.next().await,
            Some(Message::Text("hello".to_string()))
        );
        assert_eq!(
            sink_rx.next().await,
            Some(Message::Text("world".to_string()))
        );
        assert_eq!(sink_rx.next().await, Some(Message::Close(None)));
        assert_eq!(sink_rx.next().await, None);
    }

    #[tokio::test]
    async fn test_writer_stops_on_sink_failure() {
        let (queue_tx, queue_rx) = mpsc::channel::<String>(8);
        let (sink_tx, sink_rx) = futures::channel::mpsc::unbounded::<Message>();

        // Receiver gone: every send fails
        drop(sink_rx);

        let writer = tokio::spawn(run_writer(sink_tx, queue_rx));
        queue_tx.send("lost".to_string()).await.unwrap();

        tokio::time::timeout(Duration::from_secs(2), writer)
            .await
            .expect("writer did not terminate")
            .unwrap();
    }
}
