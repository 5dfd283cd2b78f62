pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::api::handlers::{auth, files, folders, health, tags};
use crate::api::middleware::{auth::auth_middleware, request_id::request_id_middleware};
use crate::config::AppConfig;
use crate::services::{
    auth_service::AuthService, file_service::FileService, folder_service::FolderService,
    storage::StorageService, tag_service::TagService,
};
use crate::utils::auth::TokenService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::current_user,
        api::handlers::folders::list_folders,
        api::handlers::folders::folder_tree,
        api::handlers::folders::create_folder,
        api::handlers::folders::delete_folder,
        api::handlers::files::upload_file,
        api::handlers::files::list_files,
        api::handlers::files::get_file,
        api::handlers::files::issue_access_token,
        api::handlers::files::file_content,
        api::handlers::files::download_file,
        api::handlers::files::update_tags,
        api::handlers::files::delete_file,
        api::handlers::tags::list_tags,
        api::handlers::tags::create_tag,
        api::handlers::tags::update_tag,
        api::handlers::tags::delete_tag,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::auth::LoginRequest,
            api::handlers::auth::LoginResponse,
            api::handlers::auth::UserResponse,
            api::handlers::auth::MessageResponse,
            api::handlers::folders::CreateFolderRequest,
            api::handlers::folders::FolderResponse,
            api::handlers::folders::FolderNode,
            api::handlers::files::FileResponse,
            api::handlers::files::UploadForm,
            api::handlers::files::AccessTokenResponse,
            api::handlers::files::UpdateTagsRequest,
            api::handlers::tags::TagRequest,
            api::handlers::tags::TagResponse,
            api::handlers::health::HealthResponse,
            utils::validation::FileKind,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "folders", description = "Folder hierarchy endpoints"),
        (name = "files", description = "File management endpoints"),
        (name = "tags", description = "Tag registry endpoints")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub config: AppConfig,
    pub tokens: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub folder_service: Arc<FolderService>,
    pub file_service: Arc<FileService>,
    pub tag_service: Arc<TagService>,
}

impl AppState {
    /// Wires the services around one connection, blob store and token service.
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn StorageService>,
        config: AppConfig,
        tokens: Arc<TokenService>,
    ) -> Self {
        let file_service = Arc::new(FileService::new(db.clone(), storage.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(db.clone(), tokens.clone())),
            folder_service: Arc::new(FolderService::new(db.clone(), file_service.clone())),
            tag_service: Arc::new(TagService::new(db.clone())),
            file_service,
            tokens,
            storage,
            config,
            db,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/user", get(auth::current_user))
        .route(
            "/folders",
            get(folders::list_folders).post(folders::create_folder),
        )
        .route("/folders/tree", get(folders::folder_tree))
        .route("/folders/:id", axum::routing::delete(folders::delete_folder))
        .route(
            "/files/upload",
            post(files::upload_file).layer(DefaultBodyLimit::max(
                state.config.max_file_size + 10 * 1024 * 1024, // Add 10MB buffer for multipart overhead
            )),
        )
        .route("/files", get(files::list_files))
        .route("/files/:id", get(files::get_file).delete(files::delete_file))
        .route("/files/:id/access-token", get(files::issue_access_token))
        .route("/files/:id/download", get(files::download_file))
        .route("/files/:id/tags", put(files::update_tags))
        .route("/tags", get(tags::list_tags).post(tags::create_tag))
        .route("/tags/:id", put(tags::update_tag).delete(tags::delete_tag))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    // Content is authorized by the file-access token in the query, not the session.
    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/files/:id/content", get(files::file_content));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api", public.merge(protected))
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer(&state.config.allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
