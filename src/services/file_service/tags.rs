use crate::api::error::AppError;
use crate::entities::{file_tags, prelude::*};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

use super::{FileService, types::{FileRecord, normalize_tags}};

impl FileService {
    /// Replaces the whole tag set of a file. `None` if the file does not exist.
    pub async fn replace_tags(
        &self,
        id: &str,
        tags: Vec<String>,
    ) -> Result<Option<FileRecord>, AppError> {
        let tags = normalize_tags(tags);
        let txn = self.db.begin().await?;

        let Some(file) = Files::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        FileTags::delete_many()
            .filter(file_tags::Column::FileId.eq(id))
            .exec(&txn)
            .await?;

        if !tags.is_empty() {
            FileTags::insert_many(tags.iter().map(|tag_id| file_tags::ActiveModel {
                file_id: Set(file.id.clone()),
                tag_id: Set(tag_id.clone()),
            }))
            .exec(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(Some(FileRecord::from_model(file, tags)))
    }
}
