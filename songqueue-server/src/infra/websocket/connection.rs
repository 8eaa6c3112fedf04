use chrono::{DateTime, Utc};
use songqueue_core::QueueEvent;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The connection's buffer is full; the event was dropped for it.
    #[error("connection buffer full")]
    Lagging,
    /// The receiving side is gone.
    #[error("connection channel closed")]
    Closed,
}

pub struct Connection {
    /// Unique connection ID
    pub id: Uuid,
    pub connected_at: DateTime<Utc>,
    /// Channel to send messages to this connection
    sender: mpsc::Sender<QueueEvent>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("connected_at", &self.connected_at)
            .field("channel_closed", &self.sender.is_closed())
            .field("buffer_free", &self.sender.capacity())
            .finish()
    }
}

impl Connection {
    pub fn new(sender: mpsc::Sender<QueueEvent>) -> Self {
        Self {
            id: Uuid::now_v7(),
            connected_at: Utc::now(),
            sender,
        }
    }

    /// Queue an event without waiting for buffer space.
    pub fn try_deliver(&self, event: QueueEvent) -> Result<(), DeliveryError> {
        self.sender.try_send(event).map_err(|err| match err {
            TrySendError::Full(_) => DeliveryError::Lagging,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}
