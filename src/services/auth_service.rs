use crate::api::error::AppError;
use crate::entities::{prelude::*, users};
use crate::utils::auth::{IssuedToken, TokenService};
use crate::utils::password::verify_password;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;

/// Composes credential verification with session token issuance.
pub struct AuthService {
    db: DatabaseConnection,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, tokens: Arc<TokenService>) -> Self {
        Self { db, tokens }
    }

    /// Unknown usernames and wrong passwords both yield `None`.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<(users::Model, IssuedToken)>, AppError> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        let Some(user) = user.filter(|u| verify_password(password, &u.password_hash)) else {
            tracing::info!("Rejected login attempt for '{}'", username);
            return Ok(None);
        };

        let token = self.tokens.issue_session(&user)?;
        tracing::info!("User {} logged in", user.id);
        Ok(Some((user, token)))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<users::Model>, AppError> {
        Ok(Users::find_by_id(id).one(&self.db).await?)
    }
}
