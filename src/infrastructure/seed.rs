use crate::entities::{folders, prelude::*, users};
use crate::services::folder_service::{ROOT_FOLDER_ID, ROOT_FOLDER_NAME};
use crate::utils::password::hash_password;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

/// Creates the initial account and the root folder when they are missing.
pub async fn seed_initial_data(
    db: &DatabaseConnection,
    admin_username: &str,
    admin_password: &str,
) -> anyhow::Result<()> {
    info!("🌱 Seeding initial data...");

    let admin_exists = Users::find()
        .filter(users::Column::Username.eq(admin_username))
        .one(db)
        .await?
        .is_some();

    if !admin_exists {
        let password_hash = hash_password(admin_password)?;
        users::ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            username: Set(admin_username.to_string()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        info!("   - Created user '{}'", admin_username);
    }

    if Folders::find_by_id(ROOT_FOLDER_ID).one(db).await?.is_none() {
        folders::ActiveModel {
            id: Set(ROOT_FOLDER_ID.to_string()),
            name: Set(ROOT_FOLDER_NAME.to_string()),
            parent_id: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        info!("   - Created root folder");
    }

    Ok(())
}
