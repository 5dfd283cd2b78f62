use crate::api::error::AppError;
use crate::entities::{file_tags, prelude::*, tags};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

/// Registry of named, colored labels
pub struct TagService {
    db: DatabaseConnection,
}

impl TagService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<tags::Model>, AppError> {
        Ok(Tags::find()
            .order_by_asc(tags::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn create(&self, name: &str, color: &str) -> Result<tags::Model, AppError> {
        let tag = tags::ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            name: Set(name.trim().to_string()),
            color: Set(color.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(tag)
    }

    pub async fn update(
        &self,
        id: &str,
        name: &str,
        color: &str,
    ) -> Result<Option<tags::Model>, AppError> {
        let Some(tag) = Tags::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = tag.into_active_model();
        active.name = Set(name.trim().to_string());
        active.color = Set(color.to_string());

        Ok(Some(active.update(&self.db).await?))
    }

    /// Removes the tag and retracts it from every file that carries it.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let txn = self.db.begin().await?;

        if Tags::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        let retracted = FileTags::delete_many()
            .filter(file_tags::Column::TagId.eq(id))
            .exec(&txn)
            .await?;
        let res = Tags::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            "Deleted tag {} (retracted from {} file(s))",
            id,
            retracted.rows_affected
        );
        Ok(res.rows_affected > 0)
    }
}
