use crate::api::error::AppError;
use crate::services::folder_service::ROOT_FOLDER_ID;
use axum::{
    Json,
    extract::{Path, Query, State},
};

use super::types::*;

#[utoipa::path(
    get,
    path = "/api/files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Files in the folder", body = [FileResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "files"
)]
pub async fn list_files(
    State(state): State<crate::AppState>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<FileResponse>>, AppError> {
    let folder_id = query
        .folder_id
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(ROOT_FOLDER_ID);

    let files = state.file_service.list_by_folder(folder_id).await?;
    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/files/{id}",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = FileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "files"
)]
pub async fn get_file(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>, AppError> {
    let file = state
        .file_service
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    Ok(Json(file.into()))
}
