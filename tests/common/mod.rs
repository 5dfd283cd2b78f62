#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_file_organizer::config::AppConfig;
use rust_file_organizer::infrastructure::{database, seed};
use rust_file_organizer::services::storage::StorageService;
use rust_file_organizer::utils::auth::TokenService;
use rust_file_organizer::{AppState, create_app};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password";

const BOUNDARY: &str = "----TestBoundary7MA4YWxkTrZu0gW";

pub struct MockStorageService {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn remove(&self, path: &str) {
        self.files.lock().unwrap().remove(path);
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn save(&self, key: &str, data: Vec<u8>) -> anyhow::Result<String> {
        let path = format!("mock/{}", key);
        self.files.lock().unwrap().insert(path.clone(), data);
        Ok(path)
    }

    async fn read(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Key not found"))
    }

    async fn delete(&self, path: &str) -> anyhow::Result<bool> {
        Ok(self.files.lock().unwrap().remove(path).is_some())
    }

    async fn exists(&self, path: &str) -> anyhow::Result<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }
}

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
    pub state: AppState,
    /// Session token of the seeded admin
    pub token: String,
}

pub async fn setup_test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    database::run_migrations(&db).await.unwrap();
    seed::seed_initial_data(&db, ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .unwrap();
    db
}

pub async fn spawn_app_with_storage(storage: Arc<dyn StorageService>) -> TestApp {
    let db = setup_test_db().await;
    let config = AppConfig::development();
    let tokens = Arc::new(TokenService::from_config(&config));
    let state = AppState::new(db.clone(), storage, config, tokens);
    let app = create_app(state.clone());

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    TestApp {
        app,
        db,
        state,
        token,
    }
}

pub async fn spawn_app() -> (TestApp, Arc<MockStorageService>) {
    let storage = Arc::new(MockStorageService::new());
    let app = spawn_app_with_storage(storage.clone()).await;
    (app, storage)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn upload_request(
    token: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
    folder_id: Option<&str>,
    tags: Option<&str>,
) -> Request<Body> {
    let mut body = Vec::new();

    if let Some(folder_id) = folder_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"folderId\"\r\n\r\n{folder_id}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(tags) = tags {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"tags\"\r\n\r\n{tags}\r\n")
                .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/files/upload")
        .header("Authorization", format!("Bearer {}", token))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Sends a request and parses the body as JSON (`Null` when empty).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, _, bytes) = send_raw(app, req).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes)
}

/// Uploads a file and returns its JSON representation.
pub async fn upload(
    test: &TestApp,
    filename: &str,
    content_type: &str,
    data: &[u8],
    folder_id: Option<&str>,
    tags: Option<&str>,
) -> Value {
    let (status, body) = send(
        &test.app,
        upload_request(&test.token, filename, content_type, data, folder_id, tags),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "upload failed: {}", body);
    body
}

pub async fn create_folder(test: &TestApp, name: &str, parent_id: Option<&str>) -> String {
    let (status, body) = send(
        &test.app,
        json_request(
            "POST",
            "/api/folders",
            Some(&test.token),
            serde_json::json!({ "name": name, "parentId": parent_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "folder creation failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}
