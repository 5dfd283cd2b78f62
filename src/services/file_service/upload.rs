use crate::api::error::AppError;
use crate::entities::{file_tags, files, prelude::*};
use crate::utils::validation::{classify_content_type, generate_storage_key, sanitize_filename};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

use super::{FileService, types::{FileRecord, normalize_tags}};

impl FileService {
    /// Classifies, stores and records an uploaded file.
    ///
    /// The content type is checked before anything is written. Bytes go to the blob
    /// store first; the metadata row and its tag rows are inserted in one transaction
    /// afterwards, so a record only becomes visible once its content exists.
    pub async fn upload(
        &self,
        content: Vec<u8>,
        content_type: &str,
        original_name: &str,
        folder_id: &str,
        tags: Vec<String>,
    ) -> Result<FileRecord, AppError> {
        let kind = classify_content_type(content_type)
            .ok_or_else(|| AppError::UnsupportedType(content_type.to_string()))?;

        let name = sanitize_filename(original_name);
        let key = generate_storage_key(&name);
        let size = content.len() as i64;

        tracing::info!(
            "Uploading '{}' ({} bytes, {}) to folder {} as {}",
            name,
            size,
            kind,
            folder_id,
            key
        );

        let path = self
            .storage
            .save(&key, content)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", key, e)))?;

        let model = files::ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            name: Set(name),
            folder_id: Set(folder_id.to_string()),
            kind: Set(kind.as_str().to_string()),
            size: Set(size),
            path: Set(path.clone()),
            created_at: Set(Utc::now()),
        };

        match self.insert_metadata(model, normalize_tags(tags)).await {
            Ok(record) => Ok(record),
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&path).await {
                    tracing::warn!("Failed to remove orphaned content {}: {}", path, cleanup);
                }
                Err(e)
            }
        }
    }

    async fn insert_metadata(
        &self,
        model: files::ActiveModel,
        tags: Vec<String>,
    ) -> Result<FileRecord, AppError> {
        let txn = self.db.begin().await?;

        let file = model.insert(&txn).await?;

        if !tags.is_empty() {
            FileTags::insert_many(tags.iter().map(|tag_id| file_tags::ActiveModel {
                file_id: Set(file.id.clone()),
                tag_id: Set(tag_id.clone()),
            }))
            .exec(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(FileRecord::from_model(file, tags))
    }
}
