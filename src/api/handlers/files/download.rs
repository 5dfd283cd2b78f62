use crate::api::error::AppError;
use crate::services::file_service::FileRecord;
use crate::utils::auth::Claims;
use crate::utils::validation::served_content_type;
use axum::{
    Extension, Json,
    body::Body,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::Response,
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use super::types::*;

#[utoipa::path(
    get,
    path = "/api/files/{id}/access-token",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Short-lived token for the content route", body = AccessTokenResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "files"
)]
pub async fn issue_access_token(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    if state.file_service.get_physical_path(&id).await?.is_none() {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let issued = state.tokens.issue_file_access(&id, &claims.sub)?;
    tracing::debug!("Issued access token for file {} to user {}", id, claims.sub);

    Ok(Json(AccessTokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// Serves file bytes inline. Authorized only by a file-access token for this file;
/// every token failure gets the same 401.
#[utoipa::path(
    get,
    path = "/api/files/{id}/content",
    params(
        ("id" = String, Path, description = "File ID"),
        ContentQuery
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 401, description = "Invalid or expired access token"),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn file_content(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Response, AppError> {
    let authorized = query
        .token
        .as_deref()
        .is_some_and(|token| state.tokens.validate_file_access(token, &id));

    if !authorized {
        return Err(AppError::TokenInvalid);
    }

    let (file, bytes) = state
        .file_service
        .read_content(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    content_response(&file, bytes, "inline")
}

#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content as attachment"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "files"
)]
pub async fn download_file(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (file, bytes) = state
        .file_service
        .read_content(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    tracing::info!("Serving download of {} ({} bytes)", file.id, bytes.len());
    content_response(&file, bytes, "attachment")
}

fn content_response(
    file: &FileRecord,
    bytes: Vec<u8>,
    disposition: &str,
) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, served_content_type(&file.name, file.kind))
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(disposition, &file.name),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
}

/// ASCII `filename` fallback plus an RFC 5987 `filename*` for the real name.
fn content_disposition(disposition: &str, filename: &str) -> String {
    let ascii_name: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        disposition,
        ascii_name,
        utf8_percent_encode(filename, NON_ALPHANUMERIC)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_encodes_unicode() {
        let value = content_disposition("attachment", "résumé.pdf");
        assert_eq!(
            value,
            "attachment; filename=\"r_sum_.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9%2Epdf"
        );
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        let value = content_disposition("inline", "a\"b.png");
        assert!(value.starts_with("inline; filename=\"a_b.png\";"));
    }
}
