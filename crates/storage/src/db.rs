use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::SqlitePool;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::schema;

/// Handle to the standings store.
///
/// Owns the connection pool, the on-disk location and the process-wide
/// write lock. Readers query the pool directly; every mutating operation
/// (ingestion, rebuild, repair, backup/restore) must hold the guard from
/// [`Database::acquire_write`] for its whole duration.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl Database {
    /// Opens (creating if missing) the store at `path` in WAL mode.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self {
            pool,
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes writers. The guard must be held across every mutating
    /// sequence, including backup and restore.
    pub async fn acquire_write(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Creates all entity tables and indexes if they do not exist.
    pub async fn create_tables(&self) -> Result<()> {
        sqlx::query(schema::CREATE_RACE_SCHEDULE)
            .execute(&self.pool)
            .await?;
        sqlx::query(schema::CREATE_DRIVER_STANDINGS)
            .execute(&self.pool)
            .await?;
        sqlx::query(schema::CREATE_TEAM_STANDINGS)
            .execute(&self.pool)
            .await?;
        sqlx::query(schema::CREATE_SCHEMA_VERSION)
            .execute(&self.pool)
            .await?;
        for index in schema::CREATE_INDEXES {
            sqlx::query(index).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Destroys every entity table. Only the rebuild path calls this, with
    /// the write lock held and a snapshot taken first.
    pub async fn drop_tables(&self) -> Result<()> {
        for statement in schema::DROP_TABLES {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Stamps the store with the current structural hash.
    pub async fn write_schema_version(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM schema_version")
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO schema_version (hash) VALUES (?)")
            .bind(schema::schema_hash())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// The persisted structural hash, if any.
    pub async fn read_schema_version(&self) -> Result<Option<String>> {
        if !self.table_exists("schema_version").await? {
            return Ok(None);
        }
        let hash: Option<String> = sqlx::query_scalar("SELECT hash FROM schema_version")
            .fetch_optional(&self.pool)
            .await?;
        Ok(hash)
    }

    /// Whether the store must be destroyed and repopulated: missing version
    /// stamp, structural drift, or no schedule rows for the active season.
    /// (A store file that does not exist yet reaches here as an empty
    /// database with no tables, which is also a rebuild.)
    pub async fn needs_rebuild(&self, season: i64) -> Result<bool> {
        let stored = self.read_schema_version().await?;
        match stored {
            None => {
                tracing::info!("No schema version found, rebuild required");
                return Ok(true);
            }
            Some(hash) if hash != schema::schema_hash() => {
                tracing::info!("Schema hash mismatch, rebuild required");
                return Ok(true);
            }
            Some(_) => {}
        }

        if !self.table_exists("race_schedule").await? {
            tracing::info!("Schedule table missing, rebuild required");
            return Ok(true);
        }
        let entries: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM race_schedule WHERE season = ?")
                .bind(season)
                .fetch_one(&self.pool)
                .await?;
        if entries == 0 {
            tracing::info!(season, "No schedule entries for season, rebuild required");
            return Ok(true);
        }

        Ok(false)
    }

    async fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    /// Flushes the WAL into the main database file so a byte-level copy of
    /// the file is a complete snapshot.
    pub async fn checkpoint(&self) -> Result<()> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
