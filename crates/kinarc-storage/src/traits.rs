//! Object store abstraction
//!
//! All interaction with the S3-compatible backend goes through the
//! [`ObjectGateway`] trait so handlers and tests stay decoupled from the
//! concrete store.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Streamed object bytes plus the content type the store declared, if any.
pub struct ObjectBody {
    pub stream: Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>,
    pub content_type: Option<String>,
}

impl ObjectBody {
    /// Drain the stream fully into one buffer. The media reader responds
    /// with whole buffers; there is no partial/range support.
    pub async fn into_bytes(mut self) -> StorageResult<Vec<u8>> {
        use futures::StreamExt;
        let mut buffer = Vec::new();
        while let Some(chunk) = self.stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer)
    }
}

/// Gateway to the object store.
///
/// `S3Gateway` talks to an S3-compatible endpoint; `MemoryGateway` backs
/// tests. Presigned URLs are only supported by backends that can sign.
#[async_trait]
pub trait ObjectGateway: Send + Sync {
    /// Generate a presigned PUT URL granting time-limited write permission
    /// to exactly one object key.
    async fn presigned_put_url(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Write an object synchronously (server-side relay path).
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Fetch an object as a byte stream. `NotFound` when the key does not
    /// exist.
    async fn get(&self, key: &str) -> StorageResult<ObjectBody>;

    /// Whether an object exists (HEAD).
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Publicly reachable URL for a key. Pure derivation, no network call.
    fn public_url(&self, key: &str) -> String;
}
