use crate::api::error::AppError;
use crate::entities::folders;
use crate::services::folder_service::ROOT_FOLDER_ID;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<folders::Model> for FolderResponse {
    fn from(f: folders::Model) -> Self {
        Self {
            id: f.id,
            name: f.name,
            parent_id: f.parent_id,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub children: Vec<FolderNode>,
}

/// Nests a flat folder list. Folders without a parent are the roots; folders whose
/// parent is not in the list are left out.
pub fn build_folder_tree(folders: Vec<folders::Model>) -> Vec<FolderNode> {
    let mut children_of: HashMap<Option<String>, Vec<folders::Model>> = HashMap::new();
    for folder in folders {
        children_of
            .entry(folder.parent_id.clone())
            .or_default()
            .push(folder);
    }

    fn attach(
        parent: Option<String>,
        children_of: &mut HashMap<Option<String>, Vec<folders::Model>>,
    ) -> Vec<FolderNode> {
        children_of
            .remove(&parent)
            .unwrap_or_default()
            .into_iter()
            .map(|f| {
                let children = attach(Some(f.id.clone()), children_of);
                FolderNode {
                    id: f.id,
                    name: f.name,
                    parent_id: f.parent_id,
                    created_at: f.created_at,
                    children,
                }
            })
            .collect()
    }

    attach(None, &mut children_of)
}

#[utoipa::path(
    get,
    path = "/api/folders",
    responses(
        (status = 200, description = "All folders", body = [FolderResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "folders"
)]
pub async fn list_folders(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<FolderResponse>>, AppError> {
    let folders = state.folder_service.list_all().await?;
    Ok(Json(folders.into_iter().map(FolderResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/folders/tree",
    responses(
        (status = 200, description = "Folder hierarchy", body = [FolderNode]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "folders"
)]
pub async fn folder_tree(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<FolderNode>>, AppError> {
    let folders = state.folder_service.list_all().await?;
    Ok(Json(build_folder_tree(folders)))
}

#[utoipa::path(
    post,
    path = "/api/folders",
    request_body = CreateFolderRequest,
    responses(
        (status = 200, description = "Folder created", body = FolderResponse),
        (status = 400, description = "Invalid name or parent folder does not exist"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "folders"
)]
pub async fn create_folder(
    State(state): State<crate::AppState>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<FolderResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let folder = state
        .folder_service
        .create(&req.name, req.parent_id.as_deref())
        .await?;

    Ok(Json(folder.into()))
}

#[utoipa::path(
    delete,
    path = "/api/folders/{id}",
    params(
        ("id" = String, Path, description = "Folder ID")
    ),
    responses(
        (status = 204, description = "Folder and its contents deleted"),
        (status = 400, description = "The root folder cannot be deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "folders"
)]
pub async fn delete_folder(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if id == ROOT_FOLDER_ID {
        return Err(AppError::BadRequest(
            "The root folder cannot be deleted".to_string(),
        ));
    }

    if !state.folder_service.delete(&id).await? {
        return Err(AppError::NotFound("Folder not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, parent: Option<&str>) -> folders::Model {
        folders::Model {
            id: id.to_string(),
            name: id.to_uppercase(),
            parent_id: parent.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_tree_nests_children() {
        let tree = build_folder_tree(vec![
            folder("root", None),
            folder("a", Some("root")),
            folder("b", Some("a")),
            folder("c", Some("root")),
        ]);

        assert_eq!(tree.len(), 1);
        let root = &tree[0];
        assert_eq!(root.id, "root");
        assert_eq!(root.children.len(), 2);

        let a = root.children.iter().find(|n| n.id == "a").unwrap();
        assert_eq!(a.children.len(), 1);
        assert_eq!(a.children[0].id, "b");
        assert!(a.children[0].children.is_empty());
    }

    #[test]
    fn test_build_tree_drops_orphans() {
        let tree = build_folder_tree(vec![
            folder("root", None),
            folder("lost", Some("gone")),
            folder("under-lost", Some("lost")),
        ]);

        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_build_tree_multiple_roots() {
        let tree = build_folder_tree(vec![folder("x", None), folder("y", None)]);
        assert_eq!(tree.len(), 2);
    }
}
