use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Byte-oriented blob store addressed by opaque path strings.
///
/// `save` returns the path under which the bytes can be read back; callers persist
/// that value and never build paths themselves.
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn save(&self, key: &str, data: Vec<u8>) -> Result<String>;
    async fn read(&self, path: &str) -> Result<Vec<u8>>;
    /// Returns `false` when nothing was stored at `path`.
    async fn delete(&self, path: &str) -> Result<bool>;
    async fn exists(&self, path: &str) -> Result<bool>;
}

/// Stores blobs as plain files inside one directory.
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn save(&self, key: &str, data: Vec<u8>) -> Result<String> {
        if key.contains('/') || key.contains('\\') || key.starts_with('.') {
            return Err(anyhow!("Invalid storage key: {}", key));
        }

        let path = self.root.join(key);
        tokio::fs::write(&path, data).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }
}

pub struct S3StorageService {
    client: Client,
    bucket: String,
}

impl S3StorageService {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn save(&self, key: &str, data: Vec<u8>) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await?;
        Ok(key.to_string())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let res = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await?;
        let data = res.body.collect().await?.to_vec();
        Ok(data)
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        if !self.exists(path).await? {
            return Ok(false);
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await?;
        Ok(true)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let res = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(anyhow!(service_error))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_storage_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(dir.path()).await.unwrap();

        let path = storage.save("abc.png", b"bytes".to_vec()).await.unwrap();
        assert!(storage.exists(&path).await.unwrap());
        assert_eq!(storage.read(&path).await.unwrap(), b"bytes");

        assert!(storage.delete(&path).await.unwrap());
        assert!(!storage.exists(&path).await.unwrap());
        assert!(!storage.delete(&path).await.unwrap());
        assert!(storage.read(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_local_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(dir.path()).await.unwrap();

        assert!(storage.save("../escape.png", vec![1]).await.is_err());
        assert!(storage.save("nested/file.png", vec![1]).await.is_err());
    }
}
