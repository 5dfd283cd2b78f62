use crate::api::error::AppError;
use crate::entities::{file_tags, files, prelude::*};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

use super::{FileService, types::FileRecord};

impl FileService {
    pub async fn get(&self, id: &str) -> Result<Option<FileRecord>, AppError> {
        let Some(file) = Files::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut tags = load_tags(&self.db, &[file.id.clone()]).await?;
        let file_tags = tags.remove(&file.id).unwrap_or_default();
        Ok(Some(FileRecord::from_model(file, file_tags)))
    }

    pub async fn list_by_folder(&self, folder_id: &str) -> Result<Vec<FileRecord>, AppError> {
        let files = Files::find()
            .filter(files::Column::FolderId.eq(folder_id))
            .order_by_asc(files::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let ids: Vec<String> = files.iter().map(|f| f.id.clone()).collect();
        let mut tags = load_tags(&self.db, &ids).await?;

        Ok(files
            .into_iter()
            .map(|f| {
                let file_tags = tags.remove(&f.id).unwrap_or_default();
                FileRecord::from_model(f, file_tags)
            })
            .collect())
    }

    pub async fn get_physical_path(&self, id: &str) -> Result<Option<String>, AppError> {
        Ok(Files::find_by_id(id).one(&self.db).await?.map(|f| f.path))
    }

    /// Metadata plus stored bytes. A content read failure is reported as `None`.
    pub async fn read_content(&self, id: &str) -> Result<Option<(FileRecord, Vec<u8>)>, AppError> {
        let Some(file) = self.get(id).await? else {
            return Ok(None);
        };

        match self.storage.read(&file.path).await {
            Ok(bytes) => Ok(Some((file, bytes))),
            Err(e) => {
                tracing::warn!("Failed to read content {} of file {}: {}", file.path, id, e);
                Ok(None)
            }
        }
    }
}

async fn load_tags<C: ConnectionTrait>(
    db: &C,
    file_ids: &[String],
) -> Result<HashMap<String, Vec<String>>, DbErr> {
    if file_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = FileTags::find()
        .filter(file_tags::Column::FileId.is_in(file_ids.iter().cloned()))
        .order_by_asc(file_tags::Column::TagId)
        .all(db)
        .await?;

    let mut by_file: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        by_file.entry(row.file_id).or_default().push(row.tag_id);
    }
    Ok(by_file)
}
