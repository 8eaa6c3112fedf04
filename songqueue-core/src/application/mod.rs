//! Application services composed from the storage ports.

pub mod events;
pub mod queue_service;

pub use events::{NoopPublisher, QueueEventPublisher};
pub use queue_service::QueueService;
