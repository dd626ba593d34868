pub mod backup;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod repository;
pub mod schema;
pub mod scoring;
pub mod services;

pub use backup::{BackupCoordinator, BackupHandle, BackupMeta};
pub use db::Database;
pub use error::{Result, StorageError};
pub use scoring::EventKind;
