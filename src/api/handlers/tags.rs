use crate::api::error::AppError;
use crate::entities::tags;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
pub struct TagRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Display color, stored as given (e.g. `#ff8800`)
    #[validate(length(max = 64))]
    pub color: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl From<tags::Model> for TagResponse {
    fn from(t: tags::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            color: t.color,
            created_at: t.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "All tags", body = [TagResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "tags"
)]
pub async fn list_tags(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = state.tag_service.list_all().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid tag"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "tags"
)]
pub async fn create_tag(
    State(state): State<crate::AppState>,
    Json(req): Json<TagRequest>,
) -> Result<Json<TagResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let tag = state.tag_service.create(&req.name, &req.color).await?;
    Ok(Json(tag.into()))
}

#[utoipa::path(
    put,
    path = "/api/tags/{id}",
    params(
        ("id" = String, Path, description = "Tag ID")
    ),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag updated", body = TagResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tag not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "tags"
)]
pub async fn update_tag(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(req): Json<TagRequest>,
) -> Result<Json<TagResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let tag = state
        .tag_service
        .update(&id, &req.name, &req.color)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

    Ok(Json(tag.into()))
}

#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    params(
        ("id" = String, Path, description = "Tag ID")
    ),
    responses(
        (status = 204, description = "Tag deleted and removed from all files"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tag not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "tags"
)]
pub async fn delete_tag(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.tag_service.delete(&id).await? {
        return Err(AppError::NotFound("Tag not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
