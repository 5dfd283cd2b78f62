use crate::api::error::AppError;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::types::*;

#[utoipa::path(
    put,
    path = "/api/files/{id}/tags",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    request_body = UpdateTagsRequest,
    responses(
        (status = 200, description = "Tag set replaced", body = FileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "files"
)]
pub async fn update_tags(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTagsRequest>,
) -> Result<Json<FileResponse>, AppError> {
    let file = state
        .file_service
        .replace_tags(&id, req.tags)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    Ok(Json(file.into()))
}

#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "files"
)]
pub async fn delete_file(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.file_service.delete(&id).await? {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
