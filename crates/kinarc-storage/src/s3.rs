use crate::traits::{ObjectBody, ObjectGateway, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use http::Method;
use kinarc_core::R2Config;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Attribute;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::time::Duration;

/// Gateway to an S3-compatible store (Cloudflare R2, MinIO, AWS S3).
#[derive(Clone)]
pub struct S3Gateway {
    store: AmazonS3,
    bucket: String,
    endpoint: String,
    public_base_url: Option<String>,
}

impl S3Gateway {
    /// Build the gateway from R2 configuration. Fails with `ConfigError`
    /// when credentials, endpoint, or bucket are unset.
    pub fn new(config: &R2Config) -> StorageResult<Self> {
        let endpoint = config.endpoint().ok_or_else(|| {
            StorageError::ConfigError("object store endpoint or account id missing".to_string())
        })?;
        let bucket = config
            .bucket
            .clone()
            .ok_or_else(|| StorageError::ConfigError("object store bucket missing".to_string()))?;
        let access_key_id = config.access_key_id.clone().ok_or_else(|| {
            StorageError::ConfigError("object store access key id missing".to_string())
        })?;
        let secret_access_key = config.secret_access_key.clone().ok_or_else(|| {
            StorageError::ConfigError("object store secret access key missing".to_string())
        })?;

        let allow_http = endpoint.starts_with("http://");
        let store = AmazonS3Builder::new()
            .with_region("auto")
            .with_bucket_name(bucket.clone())
            .with_endpoint(endpoint.clone())
            .with_allow_http(allow_http)
            .with_access_key_id(access_key_id)
            .with_secret_access_key(secret_access_key)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Gateway {
            store,
            bucket,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            public_base_url: config
                .public_base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
        })
    }
}

#[async_trait]
impl ObjectGateway for S3Gateway {
    async fn presigned_put_url(
        &self,
        key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let location = Path::from(key.to_string());
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::PUT, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Presigned PUT URL generation failed"
                );
                StorageError::BackendError(e.to_string())
            })?
            .to_string();

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            expires_in_secs = expires_in.as_secs(),
            "Presigned PUT URL generated"
        );

        Ok(url)
    }

    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<()> {
        let size = data.len() as u64;
        let bytes = Bytes::from(data);
        let location = Path::from(key.to_string());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.put(&location, PutPayload::from(bytes)).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<ObjectBody> {
        let location = Path::from(key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.to_string());

        let bucket = self.bucket.clone();
        let key_owned = key.to_string();
        let stream = result.into_stream().map(move |res| {
            res.map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key_owned,
                    "S3 stream download error"
                );
                StorageError::DownloadFailed(e.to_string())
            })
        });

        Ok(ObjectBody {
            stream: Box::pin(stream),
            content_type,
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

    /// Public URL: configured public base when present, else path-style
    /// `{endpoint}/{bucket}/{key}`.
    fn public_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base, key),
            None => format!("{}/{}/{}", self.endpoint, self.bucket, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(public_url: Option<&str>) -> R2Config {
        R2Config {
            account_id: Some("acct".to_string()),
            access_key_id: Some("key".to_string()),
            secret_access_key: Some("secret".to_string()),
            bucket: Some("archive".to_string()),
            endpoint: Some("https://acct.r2.cloudflarestorage.com/".to_string()),
            public_base_url: public_url.map(|s| s.to_string()),
        }
    }

    #[test]
    fn public_url_prefers_configured_base() {
        let gateway = S3Gateway::new(&config(Some("https://media.example.com/"))).unwrap();
        assert_eq!(
            gateway.public_url("originals/a/b.jpg"),
            "https://media.example.com/originals/a/b.jpg"
        );
    }

    #[test]
    fn public_url_falls_back_to_endpoint_and_bucket() {
        let gateway = S3Gateway::new(&config(None)).unwrap();
        assert_eq!(
            gateway.public_url("originals/a/b.jpg"),
            "https://acct.r2.cloudflarestorage.com/archive/originals/a/b.jpg"
        );
    }

    #[test]
    fn missing_credentials_fail_with_config_error() {
        let mut cfg = config(None);
        cfg.access_key_id = None;
        match S3Gateway::new(&cfg) {
            Err(StorageError::ConfigError(_)) => {}
            other => panic!("expected ConfigError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_endpoint_and_account_fail_with_config_error() {
        let mut cfg = config(None);
        cfg.endpoint = None;
        cfg.account_id = None;
        assert!(matches!(
            S3Gateway::new(&cfg),
            Err(StorageError::ConfigError(_))
        ));
    }
}
