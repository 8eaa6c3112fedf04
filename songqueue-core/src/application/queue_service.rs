use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::events::QueueEventPublisher;
use crate::database::ports::entries::EntryRepository;
use crate::error::{QueueError, Result};
use crate::types::{
    CreateEntryRequest, Entry, EntryPatch, NewEntry, QueueEvent,
    UpdateEntryRequest,
};

/// Request handling for the song queue.
///
/// Holds no entry state between calls. Every mutation commits to the store and
/// then publishes exactly one [`QueueEvent`]; reads never publish.
#[derive(Clone)]
pub struct QueueService {
    entries: Arc<dyn EntryRepository>,
    publisher: Arc<dyn QueueEventPublisher>,
    // Held across commit + publish so events leave in commit order.
    write_gate: Arc<Mutex<()>>,
}

impl fmt::Debug for QueueService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueService")
            .field("entries", &type_name_of_val(self.entries.as_ref()))
            .field("publisher", &type_name_of_val(self.publisher.as_ref()))
            .finish()
    }
}

impl QueueService {
    pub fn new(
        entries: Arc<dyn EntryRepository>,
        publisher: Arc<dyn QueueEventPublisher>,
    ) -> Self {
        Self {
            entries,
            publisher,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    pub async fn create_entry(&self, request: CreateEntryRequest) -> Result<Entry> {
        let new_entry = NewEntry::try_from(request)?;

        let _guard = self.write_gate.lock().await;
        let entry = self.entries.create(new_entry).await?;
        info!(entry_id = entry.id, title = %entry.title, "entry created");
        self.publisher.publish(QueueEvent::created(entry.clone()));

        Ok(entry)
    }

    pub async fn get_entry(&self, id: i64) -> Result<Entry> {
        self.entries
            .get(id)
            .await?
            .ok_or(QueueError::NotFound { id })
    }

    pub async fn list_entries(&self) -> Result<Vec<Entry>> {
        self.entries.list().await
    }

    /// Apply a partial update. Input is validated before the lookup, so an
    /// invalid status is reported even for an unknown id.
    pub async fn update_entry(
        &self,
        id: i64,
        request: UpdateEntryRequest,
    ) -> Result<Entry> {
        let patch = EntryPatch::try_from(request)?;

        let _guard = self.write_gate.lock().await;
        let entry = self
            .entries
            .update(id, &patch)
            .await?
            .ok_or(QueueError::NotFound { id })?;

        if patch.is_empty() {
            debug!(entry_id = id, "update carried no fields");
        }
        info!(entry_id = id, status = %entry.status, "entry updated");
        self.publisher.publish(QueueEvent::updated(entry.clone()));

        Ok(entry)
    }

    /// Remove every entry. Destructive and unconditional.
    pub async fn clear_all(&self) -> Result<u64> {
        let _guard = self.write_gate.lock().await;
        let removed = self.entries.clear().await?;
        info!(removed, "queue cleared");
        self.publisher.publish(QueueEvent::cleared());

        Ok(removed)
    }
}
