use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::info;

use crate::database::{
    infrastructure::sqlite::repositories::SqliteEntryRepository,
    ports::entries::EntryRepository,
};
use crate::error::{QueueError, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owner of the SQLite pool and the repositories built on top of it.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
    max_connections: u32,
    entries: SqliteEntryRepository,
}

impl fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl SqliteDatabase {
    /// Open (creating if missing) the database behind `url`, e.g.
    /// `sqlite://songs.db`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let max_connections = if max_connections == 0 {
            DEFAULT_MAX_CONNECTIONS
        } else {
            max_connections
        };

        let connect_options = SqliteConnectOptions::from_str(url)
            .map_err(|e| {
                QueueError::StoreUnavailable(format!(
                    "Invalid database URL '{url}': {e}"
                ))
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                QueueError::StoreUnavailable(format!(
                    "Database connection failed: {e}"
                ))
            })?;

        info!(
            url,
            max_connections, "Database pool initialized"
        );

        Ok(Self::from_pool(pool, max_connections))
    }

    /// Private in-memory database. The pool is pinned to one connection that
    /// never expires, otherwise each connection would see its own empty
    /// database.
    pub async fn in_memory() -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| {
                QueueError::StoreUnavailable(format!(
                    "Invalid in-memory database URL: {e}"
                ))
            })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await?;

        Ok(Self::from_pool(pool, 1))
    }

    fn from_pool(pool: SqlitePool, max_connections: u32) -> Self {
        let entries = SqliteEntryRepository::new(pool.clone());
        Self {
            pool,
            max_connections,
            entries,
        }
    }

    /// Apply embedded migrations. Safe to call on every start.
    pub async fn initialize_schema(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    /// Cheap round trip used by health checks.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| {
                QueueError::StoreUnavailable(format!("Database ping failed: {e}"))
            })
    }

    pub fn entries(&self) -> Arc<dyn EntryRepository> {
        Arc::new(self.entries.clone())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
