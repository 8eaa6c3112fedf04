use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Entry, EntryPatch, NewEntry};

/// Durable storage for queue entries.
///
/// Every call is atomic with respect to a single entry. Implementations own
/// id and `created_at` assignment.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn create(&self, entry: NewEntry) -> Result<Entry>;

    async fn get(&self, id: i64) -> Result<Option<Entry>>;

    /// All entries ordered by id ascending.
    async fn list(&self) -> Result<Vec<Entry>>;

    /// Apply the present fields of `patch`, returning the stored row, or
    /// `None` when no entry has that id.
    async fn update(&self, id: i64, patch: &EntryPatch) -> Result<Option<Entry>>;

    /// Remove every entry, returning the number of rows removed. The id
    /// sequence is not reset.
    async fn clear(&self) -> Result<u64>;
}
