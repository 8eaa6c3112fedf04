use crate::types::QueueEvent;

/// Sink for queue change notifications.
///
/// `publish` must not block on slow consumers and must not fail the caller;
/// delivery problems stay inside the implementation.
pub trait QueueEventPublisher: Send + Sync {
    fn publish(&self, event: QueueEvent);
}

/// Publisher that discards every event. Useful for tooling that mutates the
/// queue without any realtime viewers attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl QueueEventPublisher for NoopPublisher {
    fn publish(&self, _event: QueueEvent) {}
}
