use crate::infra::websocket::connection::{Connection, DeliveryError};
use dashmap::DashMap;
use songqueue_core::{QueueEvent, application::QueueEventPublisher};
use std::{fmt, sync::Arc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Registry of connected realtime viewers and the fan-out of queue events.
///
/// Delivery is fire-and-forget: each viewer owns a bounded buffer, a full
/// buffer drops the event for that viewer only, and there is no replay for
/// viewers that connect later.
#[derive(Clone)]
pub struct NotificationHub {
    /// Active connections mapped by connection ID
    connections: Arc<DashMap<Uuid, Arc<Connection>>>,
    channel_capacity: usize,
}

impl fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHub")
            .field("connection_count", &self.connections.len())
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

/// Receiving half handed to a newly registered viewer.
#[derive(Debug)]
pub struct Subscription {
    pub id: Uuid,
    pub receiver: mpsc::Receiver<QueueEvent>,
}

/// Outcome of a single broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub dropped: usize,
    pub evicted: usize,
}

impl NotificationHub {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Register a new connection
    pub fn connect(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let connection = Arc::new(Connection::new(tx));
        let id = connection.id;
        self.connections.insert(id, connection);

        info!(connection_id = %id, "realtime client connected");
        Subscription { id, receiver: rx }
    }

    /// Remove a connection. Returns false when it was already gone.
    pub fn disconnect(&self, conn_id: Uuid) -> bool {
        let removed = self.connections.remove(&conn_id).is_some();
        if removed {
            info!(connection_id = %conn_id, "realtime client disconnected");
        }
        removed
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Deliver `event` to every connection registered right now.
    pub fn broadcast(&self, event: &QueueEvent) -> BroadcastReport {
        // Snapshot first so no shard lock is held while sending or evicting.
        let snapshot: Vec<Arc<Connection>> = self
            .connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut report = BroadcastReport::default();
        for conn in snapshot {
            match conn.try_deliver(event.clone()) {
                Ok(()) => report.delivered += 1,
                Err(DeliveryError::Lagging) => {
                    report.dropped += 1;
                    warn!(
                        connection_id = %conn.id,
                        "dropping event for lagging realtime client"
                    );
                }
                Err(DeliveryError::Closed) => {
                    report.evicted += 1;
                    if self.connections.remove(&conn.id).is_some() {
                        info!(connection_id = %conn.id, "realtime client disconnected");
                    }
                }
            }
        }

        report
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl QueueEventPublisher for NotificationHub {
    fn publish(&self, event: QueueEvent) {
        let report = self.broadcast(&event);
        debug!(
            message = %event.message,
            delivered = report.delivered,
            dropped = report.dropped,
            evicted = report.evicted,
            "broadcast queue event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use songqueue_core::{Entry, EntryStatus};

    fn sample_entry() -> Entry {
        Entry {
            id: 1,
            title: "Bohemian Rhapsody".into(),
            body: "Queen".into(),
            status: EntryStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn broadcast_reaches_every_connected_client() {
        let hub = NotificationHub::new(8);
        let mut first = hub.connect();
        let mut second = hub.connect();

        let event = QueueEvent::created(sample_entry());
        let report = hub.broadcast(&event);

        assert_eq!(report.delivered, 2);
        assert_eq!(first.receiver.recv().await.unwrap(), event);
        assert_eq!(second.receiver.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn late_subscribers_get_no_replay() {
        let hub = NotificationHub::new(8);
        hub.broadcast(&QueueEvent::cleared());

        let mut late = hub.connect();
        assert!(late.receiver.try_recv().is_err());

        hub.broadcast(&QueueEvent::created(sample_entry()));
        let event = late.receiver.recv().await.unwrap();
        assert!(event.entry.is_some());
    }

    #[test]
    fn full_buffer_drops_only_for_that_client() {
        let hub = NotificationHub::new(1);
        let mut stalled = hub.connect();
        let mut healthy = hub.connect();

        let first = hub.broadcast(&QueueEvent::cleared());
        assert_eq!(first.delivered, 2);
        healthy.receiver.try_recv().unwrap();

        let second = hub.broadcast(&QueueEvent::cleared());
        assert_eq!(second.delivered, 1);
        assert_eq!(second.dropped, 1);
        assert!(healthy.receiver.try_recv().is_ok());

        // The stalled client still has its first event and stays registered.
        assert!(stalled.receiver.try_recv().is_ok());
        assert_eq!(hub.connection_count(), 2);
    }

    #[test]
    fn closed_connections_are_evicted_on_broadcast() {
        let hub = NotificationHub::new(4);
        let gone = hub.connect();
        let _kept = hub.connect();
        drop(gone.receiver);

        let report = hub.broadcast(&QueueEvent::cleared());
        assert_eq!(report.evicted, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(hub.connection_count(), 1);

        // An evicted client is gone, so a later disconnect is a no-op.
        assert!(!hub.disconnect(gone.id));
    }

    #[test]
    fn disconnect_removes_connection() {
        let hub = NotificationHub::default();
        let sub = hub.connect();
        assert_eq!(hub.connection_count(), 1);
        assert!(hub.disconnect(sub.id));
        assert!(!hub.disconnect(sub.id));
        assert_eq!(hub.connection_count(), 0);
    }
}
