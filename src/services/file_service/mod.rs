use crate::services::storage::StorageService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod delete;
pub mod query;
pub mod tags;
pub mod types;
pub mod upload;

pub use types::FileRecord;

/// File metadata manager: owns the `files` and `file_tags` tables and keeps them in
/// step with the blob store.
pub struct FileService {
    db: DatabaseConnection,
    storage: Arc<dyn StorageService>,
}

impl FileService {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageService>) -> Self {
        Self { db, storage }
    }
}
