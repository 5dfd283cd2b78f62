use crate::config::{AppConfig, StorageBackend};
use crate::services::storage::{LocalStorageService, S3StorageService, StorageService};
use anyhow::Context;
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn StorageService>> {
    match config.storage_backend {
        StorageBackend::Local => {
            info!("💾 Local Storage: {}", config.upload_dir);
            let storage = LocalStorageService::new(&config.upload_dir).await?;
            Ok(Arc::new(storage))
        }
        StorageBackend::S3 => {
            let endpoint_url = config
                .s3_endpoint
                .clone()
                .context("MINIO_ENDPOINT must be set")?;
            let access_key = config
                .s3_access_key
                .clone()
                .context("MINIO_ACCESS_KEY must be set")?;
            let secret_key = config
                .s3_secret_key
                .clone()
                .context("MINIO_SECRET_KEY must be set")?;
            let bucket = config
                .s3_bucket
                .clone()
                .context("MINIO_BUCKET must be set")?;

            info!("☁️  S3 Storage: {} (Bucket: {})", endpoint_url, bucket);

            let aws_config = aws_config::from_env()
                .endpoint_url(&endpoint_url)
                .region(Region::new("us-east-1"))
                .credentials_provider(aws_sdk_s3::config::Credentials::new(
                    access_key, secret_key, None, None, "static",
                ))
                .load()
                .await;

            let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(true)
                .build();

            let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
            Ok(Arc::new(S3StorageService::new(s3_client, bucket)))
        }
    }
}
