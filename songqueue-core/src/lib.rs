//! # SongQueue Core
//!
//! Domain types, durable storage and the queue service behind the SongQueue
//! server.
//!
//! - [`types`]: the [`Entry`](types::Entry) model, its closed status enum, and
//!   the request/event payloads
//! - [`database`]: the [`EntryRepository`](database::EntryRepository) port and
//!   its SQLite adapter
//! - [`application`]: [`QueueService`](application::QueueService), which
//!   validates input, mutates the store, and publishes change events
//!
//! ```no_run
//! use std::sync::Arc;
//! use songqueue_core::{
//!     application::{NoopPublisher, QueueService},
//!     database::SqliteDatabase,
//!     types::CreateEntryRequest,
//! };
//!
//! async fn enqueue() -> songqueue_core::error::Result<()> {
//!     let db = SqliteDatabase::connect("sqlite://songs.db", 5).await?;
//!     db.initialize_schema().await?;
//!
//!     let service = QueueService::new(db.entries(), Arc::new(NoopPublisher));
//!     let entry = service
//!         .create_entry(CreateEntryRequest::new("Bohemian Rhapsody", "Queen"))
//!         .await?;
//!     println!("queued #{}", entry.id);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Route constants shared by the server and HTTP clients
pub mod api;

/// Queue service and event publishing seam
pub mod application;

/// Entry storage port and SQLite implementation
pub mod database;

/// Error types and error handling utilities
pub mod error;

/// Entry model and wire payloads
pub mod types;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{QueueError, Result};
pub use types::{Entry, EntryStatus, QueueEvent};
