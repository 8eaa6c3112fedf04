use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, error::ErrorKind, sqlite::SqliteRow};
use tracing::debug;

use crate::database::ports::entries::EntryRepository;
use crate::error::{QueueError, Result};
use crate::types::{Entry, EntryPatch, EntryStatus, NewEntry};

#[derive(Clone)]
pub struct SqliteEntryRepository {
    pool: SqlitePool,
}

impl fmt::Debug for SqliteEntryRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteEntryRepository")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl SqliteEntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn map_row(row: &SqliteRow) -> Result<Entry> {
        let id: i64 = row.try_get("id").map_err(|e| {
            QueueError::StoreUnavailable(format!("Failed to read entry id: {e}"))
        })?;
        let title: String = row.try_get("title").map_err(|e| {
            QueueError::StoreUnavailable(format!("Failed to read title: {e}"))
        })?;
        let body: String = row.try_get("body").map_err(|e| {
            QueueError::StoreUnavailable(format!("Failed to read body: {e}"))
        })?;
        let status: String = row.try_get("status").map_err(|e| {
            QueueError::StoreUnavailable(format!("Failed to read status: {e}"))
        })?;
        let created_at: DateTime<Utc> =
            row.try_get("created_at").map_err(|e| {
                QueueError::StoreUnavailable(format!(
                    "Failed to read created_at: {e}"
                ))
            })?;

        // The CHECK constraint makes this unreachable unless the file was
        // edited by hand.
        let status: EntryStatus = status.parse().map_err(|_| {
            QueueError::StoreUnavailable(format!(
                "Entry {id} has corrupt status '{status}'"
            ))
        })?;

        Ok(Entry {
            id,
            title,
            body,
            status,
            created_at,
        })
    }
}

#[async_trait]
impl EntryRepository for SqliteEntryRepository {
    async fn create(&self, entry: NewEntry) -> Result<Entry> {
        let row = sqlx::query(
            r#"
            INSERT INTO entries (title, body, status, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, body, status, created_at
            "#,
        )
        .bind(entry.title)
        .bind(entry.body)
        .bind(entry.status.as_str())
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| write_error("Failed to create entry", e))?;

        let created = Self::map_row(&row)?;
        debug!(entry_id = created.id, "entry inserted");
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, body, status, created_at
            FROM entries
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            QueueError::StoreUnavailable(format!("Failed to load entry {id}: {e}"))
        })?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, status, created_at
            FROM entries
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            QueueError::StoreUnavailable(format!("Failed to list entries: {e}"))
        })?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update(&self, id: i64, patch: &EntryPatch) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            UPDATE entries
            SET title  = COALESCE(?, title),
                body   = COALESCE(?, body),
                status = COALESCE(?, status)
            WHERE id = ?
            RETURNING id, title, body, status, created_at
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.body.as_deref())
        .bind(patch.status.map(EntryStatus::as_str))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| write_error(&format!("Failed to update entry {id}"), e))?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM entries")
            .execute(self.pool())
            .await
            .map_err(|e| {
                QueueError::StoreUnavailable(format!(
                    "Failed to clear entries: {e}"
                ))
            })?;

        Ok(result.rows_affected())
    }
}

/// Constraint rejections are caller errors; everything else is the store.
fn write_error(context: &str, err: sqlx::Error) -> QueueError {
    match &err {
        sqlx::Error::Database(db_err)
            if matches!(db_err.kind(), ErrorKind::CheckViolation) =>
        {
            QueueError::validation(format!(
                "entry rejected by store constraint: {}",
                db_err.message()
            ))
        }
        _ => QueueError::StoreUnavailable(format!("{context}: {err}")),
    }
}
