//! File-level snapshots of the standings store.
//!
//! A snapshot is a byte copy of the database file plus a JSON metadata
//! sidecar (timestamp, source path, structural hash). Callers must hold the
//! store's write lock and checkpoint the WAL before snapshotting or
//! restoring; the coordinator itself only moves bytes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMeta {
    pub timestamp: String,
    pub source_path: String,
    pub backup_path: String,
    pub schema_hash: Option<String>,
}

/// Names one snapshot on disk.
#[derive(Debug, Clone)]
pub struct BackupHandle {
    pub id: String,
    pub db_file: PathBuf,
    pub meta_file: PathBuf,
}

pub struct BackupCoordinator {
    db_path: PathBuf,
    backup_dir: PathBuf,
}

impl BackupCoordinator {
    pub fn new(db_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            backup_dir: backup_dir.into(),
        }
    }

    fn handle_for(&self, id: &str) -> BackupHandle {
        BackupHandle {
            id: id.to_string(),
            db_file: self.backup_dir.join(format!("standings_{id}.db")),
            meta_file: self.backup_dir.join(format!("standings_{id}.meta.json")),
        }
    }

    /// Copies the store to a timestamped file in the backup directory and
    /// writes the metadata sidecar.
    pub async fn snapshot(&self, schema_hash: Option<String>) -> Result<BackupHandle> {
        tokio::fs::create_dir_all(&self.backup_dir).await?;

        let id = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f").to_string();
        let handle = self.handle_for(&id);

        tokio::fs::copy(&self.db_path, &handle.db_file).await?;

        let meta = BackupMeta {
            timestamp: id.clone(),
            source_path: self.db_path.display().to_string(),
            backup_path: handle.db_file.display().to_string(),
            schema_hash,
        };
        let json = serde_json::to_string_pretty(&meta)?;
        tokio::fs::write(&handle.meta_file, json).await?;

        tracing::info!(backup = %handle.db_file.display(), "Created snapshot");
        Ok(handle)
    }

    /// Copies a snapshot back over the store. The current file is set aside
    /// first and rolled back to if the copy-in fails, so the store is never
    /// left half-written.
    pub async fn restore(&self, handle: &BackupHandle) -> Result<()> {
        if !handle.db_file.exists() {
            return Err(StorageError::Backup(format!(
                "Snapshot {} not found",
                handle.id
            )));
        }

        let set_aside = self.db_path.with_extension("db.pre_restore");
        let had_current = self.db_path.exists();
        if had_current {
            tokio::fs::copy(&self.db_path, &set_aside).await?;
        }

        // Stale WAL sidecars would shadow the restored file's contents.
        remove_wal_sidecars(&self.db_path).await?;

        match tokio::fs::copy(&handle.db_file, &self.db_path).await {
            Ok(_) => {
                if had_current {
                    tokio::fs::remove_file(&set_aside).await.ok();
                }
                tracing::info!(backup = %handle.db_file.display(), "Restored snapshot");
                Ok(())
            }
            Err(err) => {
                if had_current {
                    tokio::fs::copy(&set_aside, &self.db_path).await?;
                    tokio::fs::remove_file(&set_aside).await.ok();
                }
                Err(err.into())
            }
        }
    }

    /// Restores the most recent snapshot by timestamp ordering.
    pub async fn restore_latest(&self) -> Result<BackupHandle> {
        let handle = self.latest().await?;
        self.restore(&handle).await?;
        Ok(handle)
    }

    /// Removes a snapshot and its metadata. Called only after the
    /// destructive operation it guarded has fully succeeded.
    pub async fn prune(&self, handle: &BackupHandle) -> Result<()> {
        tokio::fs::remove_file(&handle.db_file).await.ok();
        tokio::fs::remove_file(&handle.meta_file).await.ok();
        Ok(())
    }

    /// Resolves a snapshot by its timestamp id.
    pub async fn handle(&self, id: &str) -> Result<BackupHandle> {
        let handle = self.handle_for(id);
        if handle.db_file.exists() {
            Ok(handle)
        } else {
            Err(StorageError::Backup(format!("Snapshot {id} not found")))
        }
    }

    /// The newest snapshot on disk.
    pub async fn latest(&self) -> Result<BackupHandle> {
        let mut metas = self.list().await?;
        let newest = metas
            .drain(..)
            .next()
            .ok_or_else(|| StorageError::Backup("No snapshots found".to_string()))?;
        Ok(self.handle_for(&newest.timestamp))
    }

    /// All snapshot metadata, newest first.
    pub async fn list(&self) -> Result<Vec<BackupMeta>> {
        let mut metas = Vec::new();
        if !self.backup_dir.exists() {
            return Ok(metas);
        }

        let mut entries = tokio::fs::read_dir(&self.backup_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".meta.json"))
            {
                let content = tokio::fs::read_to_string(&path).await?;
                match serde_json::from_str::<BackupMeta>(&content) {
                    Ok(meta) => metas.push(meta),
                    Err(err) => {
                        tracing::warn!(file = %path.display(), %err, "Skipping unreadable snapshot metadata");
                    }
                }
            }
        }

        metas.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(metas)
    }
}

async fn remove_wal_sidecars(db_path: &Path) -> Result<()> {
    for suffix in ["-wal", "-shm"] {
        let mut name = db_path.as_os_str().to_os_string();
        name.push(suffix);
        let sidecar = PathBuf::from(name);
        if sidecar.exists() {
            tokio::fs::remove_file(&sidecar).await?;
        }
    }
    Ok(())
}
