use crate::api::error::AppError;
use crate::entities::{file_tags, files, prelude::*};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect, TransactionTrait};

use super::FileService;

impl FileService {
    /// Removes a file's content and metadata. Returns `false` if the file is unknown.
    ///
    /// A failed physical delete is logged and does not stop the metadata delete.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let Some(file) = Files::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        match self.storage.delete(&file.path).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!("No content found at {} for file {}", file.path, id),
            Err(e) => tracing::warn!("Failed to delete content {} of file {}: {}", file.path, id, e),
        }

        let txn = self.db.begin().await?;
        FileTags::delete_many()
            .filter(file_tags::Column::FileId.eq(id))
            .exec(&txn)
            .await?;
        let res = Files::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(res.rows_affected > 0)
    }

    /// Best-effort delete of every file in a folder; returns how many were removed.
    pub async fn delete_by_folder(&self, folder_id: &str) -> Result<usize, AppError> {
        let ids: Vec<String> = Files::find()
            .select_only()
            .column(files::Column::Id)
            .filter(files::Column::FolderId.eq(folder_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut deleted = 0;
        for id in ids {
            match self.delete(&id).await {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("Failed to delete file {} in folder {}: {}", id, folder_id, e),
            }
        }

        Ok(deleted)
    }
}
