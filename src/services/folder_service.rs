use crate::api::error::AppError;
use crate::entities::{folders, prelude::*};
use crate::services::file_service::FileService;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Identifier of the folder seeded at startup. Always accepted as a parent.
pub const ROOT_FOLDER_ID: &str = "root";
pub const ROOT_FOLDER_NAME: &str = "Root";

/// Folder tree manager
pub struct FolderService {
    db: DatabaseConnection,
    files: Arc<FileService>,
}

impl FolderService {
    pub fn new(db: DatabaseConnection, files: Arc<FileService>) -> Self {
        Self { db, files }
    }

    /// Creates a folder. A blank `parent_id` makes it a tree root.
    pub async fn create(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<folders::Model, AppError> {
        let parent_id = parent_id.map(str::trim).filter(|p| !p.is_empty());

        if let Some(parent) = parent_id {
            if parent != ROOT_FOLDER_ID
                && Folders::find_by_id(parent).one(&self.db).await?.is_none()
            {
                return Err(AppError::InvalidParent(parent.to_string()));
            }
        }

        let folder = folders::ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            name: Set(name.trim().to_string()),
            parent_id: Set(parent_id.map(str::to_string)),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(
            "Created folder {} ('{}') under {}",
            folder.id,
            folder.name,
            folder.parent_id.as_deref().unwrap_or("<none>")
        );

        Ok(folder)
    }

    pub async fn get(&self, id: &str) -> Result<Option<folders::Model>, AppError> {
        Ok(Folders::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<folders::Model>, AppError> {
        Ok(Folders::find()
            .order_by_asc(folders::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Deletes a folder, every descendant folder, and every file inside any of them.
    ///
    /// Returns `false` without side effects when `id` does not exist. Content and
    /// per-file metadata removal is best-effort; folder rows go last.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        if Folders::find_by_id(id).one(&self.db).await?.is_none() {
            return Ok(false);
        }

        let mut closure = HashSet::from([id.to_string()]);
        self.collect_descendants(id, &mut closure).await?;

        tracing::info!(
            "Deleting folder {} with {} descendant folder(s)",
            id,
            closure.len() - 1
        );

        let mut removed_files = 0;
        for folder_id in &closure {
            removed_files += self.files.delete_by_folder(folder_id).await?;
        }

        let descendants: Vec<String> = closure.into_iter().filter(|f| f != id).collect();
        if !descendants.is_empty() {
            Folders::delete_many()
                .filter(folders::Column::Id.is_in(descendants))
                .exec(&self.db)
                .await?;
        }

        let res = Folders::delete_by_id(id).exec(&self.db).await?;

        tracing::info!("Folder {} deleted, {} file(s) removed", id, removed_files);
        Ok(res.rows_affected > 0)
    }

    /// Adds every transitive child of `folder_id` to `closure`. Already visited ids are
    /// not walked again.
    #[async_recursion::async_recursion]
    async fn collect_descendants(
        &self,
        folder_id: &str,
        closure: &mut HashSet<String>,
    ) -> Result<(), AppError> {
        let children = Folders::find()
            .filter(folders::Column::ParentId.eq(folder_id))
            .all(&self.db)
            .await?;

        for child in children {
            if closure.insert(child.id.clone()) {
                self.collect_descendants(&child.id, closure).await?;
            }
        }

        Ok(())
    }
}
