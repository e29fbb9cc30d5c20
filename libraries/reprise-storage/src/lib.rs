//! Reprise Storage
//!
//! Key-value persistence for Reprise and the resume-state services built on it.
//!
//! # Architecture
//!
//! - **Backends**: [`SqliteKeyValueStore`] for on-device persistence and
//!   [`MemoryKeyValueStore`] for ephemeral sessions and tests. Both implement
//!   [`reprise_core::KeyValueStore`].
//! - **Vertical Slicing**: each collection owns its keys and error translation
//!   ([`track_progress`], [`track_history`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reprise_core::identity::{hasher_for, ChecksumKind};
//! use reprise_storage::{open_store, TrackHistoryService, TrackProgressRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(open_store("sqlite://reprise.db").await?);
//!
//! let progress = TrackProgressRepository::new(store.clone(), hasher_for(ChecksumKind::Md5File));
//! let history = TrackHistoryService::new(store);
//!
//! let record = progress.get_or_create("/music/song.mp3").await?;
//! history.set_last_track(&record.uri).await?;
//! # Ok(())
//! # }
//! ```

mod error;

// Backends
pub mod memory_store;
pub mod sqlite_store;

// Vertical slices
pub mod track_history;
pub mod track_progress;

pub use error::StorageError;
pub use memory_store::MemoryKeyValueStore;
pub use sqlite_store::SqliteKeyValueStore;
pub use track_history::TrackHistoryService;
pub use track_progress::TrackProgressRepository;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://reprise.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}

/// Open a migrated SQLite-backed key-value store
///
/// # Errors
///
/// Returns an error if the connection or the migrations fail
pub async fn open_store(database_url: &str) -> Result<SqliteKeyValueStore, StorageError> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    Ok(SqliteKeyValueStore::new(pool))
}
