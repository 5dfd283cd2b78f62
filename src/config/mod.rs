use std::env;

/// Blob store backend selected at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Files written to a directory on local disk
    Local,
    /// S3-compatible bucket (MinIO in development)
    S3,
}

impl StorageBackend {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "s3" | "minio" => StorageBackend::S3,
            _ => StorageBackend::Local,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string (default: local SQLite file)
    pub database_url: String,

    /// JWT signing secret shared by session and file-access tokens
    pub jwt_secret: String,

    /// `iss` claim written into and required from every token
    pub jwt_issuer: String,

    /// `aud` claim written into and required from every token
    pub jwt_audience: String,

    /// Session token lifetime in hours (default: 24)
    pub session_ttl_hours: i64,

    /// Maximum upload size in bytes (default: 100 MB)
    pub max_file_size: usize,

    pub storage_backend: StorageBackend,

    /// Directory used by the local storage backend
    pub upload_dir: String,

    pub s3_endpoint: Option<String>,
    pub s3_access_key: Option<String>,
    pub s3_secret_key: Option<String>,
    pub s3_bucket: Option<String>,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,

    /// Account created on first start if it does not exist
    pub admin_username: String,
    pub admin_password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://data/files.db?mode=rwc".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_issuer: "rust-file-organizer".to_string(),
            jwt_audience: "rust-file-organizer-clients".to_string(),
            session_ttl_hours: 24,
            max_file_size: 100 * 1024 * 1024, // 100 MB
            storage_backend: StorageBackend::Local,
            upload_dir: "upload-dir".to_string(),
            s3_endpoint: None,
            s3_access_key: None,
            s3_secret_key: None,
            s3_bucket: None,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
            ],
            admin_username: "admin".to_string(),
            admin_password: "password".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            // Fallback for dev convenience, strictly enforced in production method
            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret),

            jwt_issuer: env::var("JWT_ISSUER").unwrap_or(default.jwt_issuer),

            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or(default.jwt_audience),

            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| *v > 0)
                .unwrap_or(default.session_ttl_hours),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            storage_backend: env::var("STORAGE_BACKEND")
                .map(|v| StorageBackend::parse(&v))
                .unwrap_or(default.storage_backend),

            upload_dir: env::var("UPLOAD_DIR").unwrap_or(default.upload_dir),

            s3_endpoint: env::var("MINIO_ENDPOINT").ok(),
            s3_access_key: env::var("MINIO_ACCESS_KEY").ok(),
            s3_secret_key: env::var("MINIO_SECRET_KEY").ok(),
            s3_bucket: env::var("MINIO_BUCKET").ok(),

            allowed_origins: parse_origins().unwrap_or(default.allowed_origins),

            admin_username: env::var("ADMIN_USERNAME").unwrap_or(default.admin_username),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(default.admin_password),
        }
    }

    /// Create config for development (in-memory database, relaxed limits)
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_file_size: 1024 * 1024 * 1024,
            ..Self::default()
        }
    }

    /// Create config for production (secret must be provided)
    pub fn production() -> Self {
        let from_env = Self::from_env();
        Self {
            jwt_secret: env::var("JWT_SECRET").expect("CRITICAL: JWT_SECRET must be set"),
            allowed_origins: parse_origins().unwrap_or_default(),
            ..from_env
        }
    }
}

fn parse_origins() -> Option<Vec<String>> {
    env::var("ALLOWED_ORIGINS").ok().map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
