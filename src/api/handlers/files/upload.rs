use crate::api::error::AppError;
use crate::services::folder_service::ROOT_FOLDER_ID;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};

use super::types::*;

#[utoipa::path(
    post,
    path = "/api/files/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = FileResponse),
        (status = 400, description = "Missing file or unsupported type"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "File too large")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileResponse>, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut folder_id: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or("unnamed").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?;

                if data.len() > state.config.max_file_size {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File exceeds the {} byte limit",
                        state.config.max_file_size
                    )));
                }

                file = Some((name, content_type, data.to_vec()));
            }
            "folderId" => {
                let value = field.text().await.map_err(multipart_error)?;
                folder_id = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            }
            "tags" => {
                let value = field.text().await.map_err(multipart_error)?;
                tags.extend(value.split(',').map(str::to_string));
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let (name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let record = state
        .file_service
        .upload(
            data,
            &content_type,
            &name,
            folder_id.as_deref().unwrap_or(ROOT_FOLDER_ID),
            tags,
        )
        .await?;

    Ok(Json(record.into()))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("Malformed multipart body: {}", e.body_text()))
    }
}
