//! In-memory gateway backed by `object_store::memory::InMemory`.
//!
//! Used by tests and local development. Cannot sign URLs, so the presigned
//! upload path reports a configuration error and callers must use the
//! relay path.

use crate::traits::{ObjectBody, ObjectGateway, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct MemoryGateway {
    store: Arc<InMemory>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        MemoryGateway {
            store: Arc::new(InMemory::new()),
        }
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectGateway for MemoryGateway {
    async fn presigned_put_url(
        &self,
        _key: &str,
        _content_type: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        Err(StorageError::ConfigError(
            "presigned URLs require an S3-compatible backend".to_string(),
        ))
    }

    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<()> {
        let location = Path::from(key.to_string());
        let result: ObjectResult<_> = self
            .store
            .put(&location, PutPayload::from(Bytes::from(data)))
            .await;
        result.map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<ObjectBody> {
        let location = Path::from(key.to_string());
        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let stream = result
            .into_stream()
            .map(|res| res.map_err(|e| StorageError::DownloadFailed(e.to_string())));

        Ok(ObjectBody {
            stream: Box::pin(stream),
            content_type: None,
        })
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = Path::from(key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("memory://{}", key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_is_byte_identical() {
        let gateway = MemoryGateway::new();
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

        gateway
            .put("originals/u/2026/03/id_file.bin", data.clone(), "application/octet-stream")
            .await
            .unwrap();

        let body = gateway.get("originals/u/2026/03/id_file.bin").await.unwrap();
        let read_back = body.into_bytes().await.unwrap();
        assert_eq!(read_back.len(), data.len());
        assert_eq!(read_back, data);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let gateway = MemoryGateway::new();
        match gateway.get("no/such/key").await {
            Err(StorageError::NotFound(key)) => assert_eq!(key, "no/such/key"),
            other => panic!("expected NotFound, got {:?}", other.err()),
        }
        assert!(!gateway.exists("no/such/key").await.unwrap());
    }

    #[tokio::test]
    async fn presigned_url_is_a_config_error() {
        let gateway = MemoryGateway::new();
        assert!(matches!(
            gateway
                .presigned_put_url("k", "image/png", Duration::from_secs(300))
                .await,
            Err(StorageError::ConfigError(_))
        ));
    }
}
