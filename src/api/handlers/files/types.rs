use crate::services::file_service::FileRecord;
use crate::utils::validation::FileKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: String,
    pub name: String,
    pub folder_id: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub size: i64,
    /// Content route; needs a file-access token as `?token=`
    pub url: String,
    /// Same as `url` for images, absent for PDFs
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponse {
    fn from(f: FileRecord) -> Self {
        let url = format!("/api/files/{}/content", f.id);
        let thumbnail_url = (f.kind == FileKind::Image).then(|| url.clone());

        Self {
            id: f.id,
            name: f.name,
            folder_id: f.folder_id,
            kind: f.kind,
            size: f.size,
            url,
            thumbnail_url,
            tags: f.tags,
            created_at: f.created_at,
        }
    }
}

/// Multipart form accepted by the upload route.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    #[schema(rename = "folderId")]
    pub folder_id: Option<String>,
    /// Comma separated tag ids
    pub tags: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListFilesQuery {
    /// Defaults to the root folder
    pub folder_id: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContentQuery {
    /// File-access token issued for this file
    pub token: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateTagsRequest {
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: FileKind) -> FileRecord {
        FileRecord {
            id: "f1".to_string(),
            name: "scan".to_string(),
            folder_id: "root".to_string(),
            kind,
            size: 3,
            path: "upload-dir/abc".to_string(),
            tags: vec!["t1".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_image_has_thumbnail_url() {
        let res = FileResponse::from(record(FileKind::Image));
        assert_eq!(res.url, "/api/files/f1/content");
        assert_eq!(res.thumbnail_url.as_deref(), Some("/api/files/f1/content"));
    }

    #[test]
    fn test_pdf_has_no_thumbnail_and_camel_case_json() {
        let json = serde_json::to_value(FileResponse::from(record(FileKind::Pdf))).unwrap();
        assert_eq!(json["type"], "pdf");
        assert_eq!(json["folderId"], "root");
        assert!(json["thumbnailUrl"].is_null());
        assert!(json.get("path").is_none());
    }
}
