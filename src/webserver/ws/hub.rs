/// Central WebSocket hub - registry and broadcaster
///
/// The WsHub is the single point of truth for which clients are connected
/// and what they all receive. It manages:
/// - Per-connection bounded outbound queues
/// - Broadcast fan-out to all registered connections
/// - Direct replies to a single connection
/// - Slow-consumer eviction
///
/// The registry holds the only sender of each connection's queue, so
/// removing an entry is what closes the queue - the terminal signal its
/// writer task acts on. All membership changes and all fan-out run under
/// the registry's write lock and are serialized against each other.
/// Eviction of a slow consumer happens in place while broadcast still
/// holds that lock; it is never routed back through unregister, so
/// broadcast can never wait on itself.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::{
    arguments::is_debug_webserver_enabled,
    logger::{self, LogTag},
};

// ============================================================================
// HUB TYPES
// ============================================================================

/// Connection ID (unique per WebSocket connection)
pub type ConnectionId = u64;

/// Per-connection sender (bounded queue of outbound text messages)
pub type OutboundSender = mpsc::Sender<String>;

/// Per-connection receiver, drained by exactly one writer task
pub type OutboundReceiver = mpsc::Receiver<String>;

/// Default per-connection outbound queue capacity
pub const OUTBOUND_QUEUE_SIZE: usize = 256;

// ============================================================================
// WS HUB
// ============================================================================

/// Central WebSocket hub
pub struct WsHub {
    /// Active connections (connection_id → sender)
    connections: RwLock<HashMap<ConnectionId, OutboundSender>>,

    /// Next connection ID
    next_conn_id: AtomicU64,

    /// Per-connection queue capacity
    queue_size: usize,
}

impl WsHub {
    /// Create a new hub
    pub fn new(queue_size: usize) -> Arc<Self> {
        Arc::new(Self {
            connections: RwLock::new(HashMap::new()),
            next_conn_id: AtomicU64::new(1),
            queue_size,
        })
    }

    /// Register a new connection
    ///
    /// Returns the connection id and the receiver its writer task drains.
    /// The matching sender lives only in the registry.
    pub async fn register(&self) -> (ConnectionId, OutboundReceiver) {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(self.queue_size);

        let active = {
            let mut connections = self.connections.write().await;
            connections.insert(conn_id, tx);
            connections.len()
        };

        logger::info(
            LogTag::Webserver,
            &format!("Registered connection {} ({} clients)", conn_id, active),
        );

        (conn_id, rx)
    }

    /// Unregister a connection
    ///
    /// Dropping the stored sender closes the outbound queue, which is the
    /// terminal signal for the connection's writer task. No-op when the
    /// connection is absent (double-unregister is tolerated).
    pub async fn unregister(&self, conn_id: ConnectionId) {
        let (removed, active) = {
            let mut connections = self.connections.write().await;
            let removed = connections.remove(&conn_id).is_some();
            (removed, connections.len())
        };

        if removed {
            logger::info(
                LogTag::Webserver,
                &format!("Unregistered connection {} ({} clients)", conn_id, active),
            );
        }
    }

    /// Broadcast a message to all registered connections
    ///
    /// Non-blocking enqueue per connection. A full queue means the client
    /// is not draining fast enough: the connection is evicted right here,
    /// inside the same critical section, and the message is not retried.
    pub async fn broadcast(&self, message: String) {
        let mut connections = self.connections.write().await;
        if connections.is_empty() {
            return;
        }

        let mut slow: Vec<ConnectionId> = Vec::new();
        let mut stale: Vec<ConnectionId> = Vec::new();

        for (conn_id, sender) in connections.iter() {
            match sender.try_send(message.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => slow.push(*conn_id),
                Err(mpsc::error::TrySendError::Closed(_)) => stale.push(*conn_id),
            }
        }

        for conn_id in slow {
            connections.remove(&conn_id);
            logger::warning(
                LogTag::Webserver,
                &format!(
                    "Evicted slow connection {} (queue full, {} clients left)",
                    conn_id,
                    connections.len()
                ),
            );
        }

        for conn_id in stale {
            // Writer already gone; just drop the dead entry
            connections.remove(&conn_id);
            if is_debug_webserver_enabled() {
                logger::debug(
                    LogTag::Webserver,
                    &format!("Dropped closed connection {}", conn_id),
                );
            }
        }
    }

    /// Send a message to one connection only (command replies)
    ///
    /// Returns false when the connection is gone or its queue is full;
    /// the reply is simply dropped in that case.
    pub async fn send_to(&self, conn_id: ConnectionId, message: String) -> bool {
        let connections = self.connections.read().await;
        match connections.get(&conn_id) {
            Some(sender) => sender.try_send(message).is_ok(),
            None => false,
        }
    }

    /// Get active connection count
    pub async fn active_connections(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_unregister_tracks_count() {
        let hub = WsHub::new(8);

        let (conn1, _rx1) = hub.register().await;
        let (conn2, _rx2) = hub.register().await;
        assert_ne!(conn1, conn2);
        assert_eq!(hub.active_connections().await, 2);

        hub.unregister(conn1).await;
        assert_eq!(hub.active_connections().await, 1);

        // Double unregister is a no-op
        hub.unregister(conn1).await;
        assert_eq!(hub.active_connections().await, 1);

        hub.unregister(conn2).await;
        assert_eq!(hub.active_connections().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_preserves_order() {
        let hub = WsHub::new(8);
        let (_conn, mut rx) = hub.register().await;

        hub.broadcast("one".to_string()).await;
        hub.broadcast("two".to_string()).await;
        hub.broadcast("three".to_string()).await;

        assert_eq!(rx.recv().await.unwrap(), "one");
        assert_eq!(rx.recv().await.unwrap(), "two");
        assert_eq!(rx.recv().await.unwrap(), "three");
    }

    #[tokio::test]
    async fn test_full_queue_evicts_only_slow_connection() {
        let hub = WsHub::new(1);

        let (_slow_id, mut slow_rx) = hub.register().await;
        let (_fast_id, mut fast_rx) = hub.register().await;

        // First broadcast fills both queues (capacity 1)
        hub.broadcast("first".to_string()).await;
        // The fast client drains, the slow one does not
        assert_eq!(fast_rx.recv().await.unwrap(), "first");

        // Second broadcast: slow queue is full, connection gets evicted
        hub.broadcast("second".to_string()).await;
        assert_eq!(hub.active_connections().await, 1);
        assert_eq!(fast_rx.recv().await.unwrap(), "second");

        // The slow client still drains what was queued, then sees the
        // closed-queue signal; the dropped message is never replayed.
        assert_eq!(slow_rx.recv().await.unwrap(), "first");
        assert_eq!(slow_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_unregister_closes_queue() {
        let hub = WsHub::new(8);
        let (conn_id, mut rx) = hub.register().await;

        hub.unregister(conn_id).await;
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_broadcast_drops_closed_connections() {
        let hub = WsHub::new(8);
        let (_conn, rx) = hub.register().await;

        // Writer side went away without unregistering
        drop(rx);

        hub.broadcast("hello".to_string()).await;
        assert_eq!(hub.active_connections().await, 0);
    }

    #[tokio::test]
    async fn test_send_to_targets_one_connection() {
        let hub = WsHub::new(8);
        let (conn1, mut rx1) = hub.register().await;
        let (_conn2, mut rx2) = hub.register().await;

        assert!(hub.send_to(conn1, "just you".to_string()).await);
        assert_eq!(rx1.recv().await.unwrap(), "just you");

        // The other connection receives nothing
        assert!(rx2.try_recv().is_err());

        hub.unregister(conn1).await;
        assert!(!hub.send_to(conn1, "gone".to_string()).await);
    }
}
