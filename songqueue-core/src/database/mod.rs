//! Durable entry storage: the repository port and its SQLite adapter.

pub mod infrastructure;
pub mod ports;
pub mod sqlite;

pub use ports::entries::EntryRepository;
pub use sqlite::SqliteDatabase;
