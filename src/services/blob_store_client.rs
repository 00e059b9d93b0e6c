use std::{path::Path, sync::Arc, time::Duration};

use async_trait::async_trait;
use bon::Builder;
use bytes::Bytes;
use chrono::Utc;
use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        errors::{BlobError, BlobResult, StorageError, ValidationError},
        models::{BlobHandle, BucketAcl, ImageFormat, SignedUrl},
        value_objects::{BucketName, ObjectKey},
    },
    ports::{services::BlobStore, storage::BlobBackend},
};

/// Default lifetime of a published URL
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(90);

/// Longest lifetime a signed URL may have
pub const MAX_URL_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Content type used when the key has no known image extension
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Upper bound on keys per listing page and per batch delete
pub const MAX_PAGE_SIZE: usize = 1000;

/// Settings of a [`BlobStoreClient`]
#[derive(Debug, Clone, Builder)]
pub struct BlobStoreConfig {
    pub bucket: BucketName,
    #[builder(default = DEFAULT_URL_TTL)]
    pub url_ttl: Duration,
    #[builder(into, default = DEFAULT_CONTENT_TYPE.to_string())]
    pub content_type: String,
    #[builder(default = MAX_PAGE_SIZE)]
    pub page_size: usize,
    #[builder(default)]
    pub bucket_acl: BucketAcl,
}

/// Client for one bucket of a remote object store
///
/// Obtained through [`BlobStoreClient::connect`], which confirms (or creates)
/// the bucket before returning. Holds no per-request state and is shared
/// behind an `Arc` by concurrent callers.
#[derive(Clone)]
pub struct BlobStoreClient {
    backend: Arc<dyn BlobBackend>,
    config: BlobStoreConfig,
}

impl BlobStoreClient {
    /// Connect to the configured bucket, creating it when the store reports
    /// it missing. Any other probe failure is fatal.
    pub async fn connect(
        backend: Arc<dyn BlobBackend>,
        config: BlobStoreConfig,
    ) -> BlobResult<Self> {
        let bucket = &config.bucket;

        match backend.head_bucket(bucket).await {
            Ok(()) => debug!("Bucket {} is available", bucket),
            Err(StorageError::BucketNotFound { .. }) => {
                info!(
                    "Bucket {} not found, creating it with ACL {}",
                    bucket, config.bucket_acl
                );
                backend
                    .create_bucket(bucket, config.bucket_acl)
                    .await
                    .map_err(|source| BlobError::BucketUnavailable {
                        bucket: bucket.to_string(),
                        source,
                    })?;
                info!("Created bucket {}", bucket);
            }
            Err(source) => {
                return Err(BlobError::BucketUnavailable {
                    bucket: bucket.to_string(),
                    source,
                });
            }
        }

        Ok(Self { backend, config })
    }

    pub fn config(&self) -> &BlobStoreConfig {
        &self.config
    }

    fn content_type_for(&self, key: &ObjectKey) -> &str {
        key.extension()
            .as_deref()
            .and_then(ImageFormat::from_extension)
            .map(|format| format.content_type())
            .unwrap_or(self.config.content_type.as_str())
    }

    fn page_size(&self) -> usize {
        self.config.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    fn check_expiration(ttl: Duration) -> Result<(), ValidationError> {
        if ttl.as_secs() == 0 || ttl > MAX_URL_TTL {
            return Err(ValidationError::InvalidExpiration {
                seconds: ttl.as_secs(),
                max: MAX_URL_TTL.as_secs(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for BlobStoreClient {
    fn bucket(&self) -> &BucketName {
        &self.config.bucket
    }

    async fn does_bucket_exist(&self, bucket: Option<&str>) -> bool {
        let bucket = match bucket {
            None => self.config.bucket.clone(),
            Some(name) => match BucketName::try_from(name) {
                Ok(bucket) => bucket,
                Err(e) => {
                    debug!("Bucket name {:?} is invalid: {}", name, e);
                    return false;
                }
            },
        };

        match self.backend.head_bucket(&bucket).await {
            Ok(()) => true,
            Err(StorageError::BucketNotFound { .. }) => {
                debug!("Bucket {} does not exist", bucket);
                false
            }
            Err(e) => {
                warn!("Bucket probe for {} failed: {}", bucket, e);
                false
            }
        }
    }

    async fn does_object_exist(&self, key: &str) -> BlobResult<bool> {
        let key = ObjectKey::try_from(key)?;

        match self.backend.head_object(&key).await {
            Ok(_) => Ok(true),
            Err(StorageError::ObjectNotFound { .. }) => Ok(false),
            Err(e) => {
                warn!("Object probe for {} failed: {}", key, e);
                Ok(false)
            }
        }
    }

    async fn upload_object(&self, content: Bytes, key: &str) -> BlobResult<BlobHandle> {
        let key = ObjectKey::try_from(key)?;
        let size = content.len() as u64;
        let content_type = self.content_type_for(&key).to_string();

        let receipt = self
            .backend
            .put_object(&key, content, &content_type)
            .await
            .map_err(|source| BlobError::UploadFailed {
                key: key.to_string(),
                source,
            })?;

        info!("Uploaded {} ({} bytes, {})", key, size, content_type);

        Ok(BlobHandle {
            key,
            size,
            etag: receipt.etag,
            version_id: receipt.version_id,
        })
    }

    async fn download_object(&self, key: &str, local_path: &Path) -> BlobResult<()> {
        let key = ObjectKey::try_from(key)?;
        if local_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyLocalPath.into());
        }

        let mut stream = self.backend.get_object(&key).await.map_err(|e| match e {
            StorageError::ObjectNotFound { .. } => BlobError::ObjectNotFound {
                key: key.to_string(),
            },
            other => BlobError::Storage(other),
        })?;

        let io_error = |source: std::io::Error| BlobError::Io {
            path: local_path.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::File::create(local_path)
            .await
            .map_err(io_error)?;

        let copied = async {
            let mut written = 0u64;
            while let Some(chunk) = stream.try_next().await? {
                file.write_all(&chunk).await.map_err(io_error)?;
                written += chunk.len() as u64;
            }
            file.flush().await.map_err(io_error)?;
            Ok::<u64, BlobError>(written)
        }
        .await;

        match copied {
            Ok(written) => {
                info!(
                    "Downloaded {} to {} ({} bytes)",
                    key,
                    local_path.display(),
                    written
                );
                Ok(())
            }
            Err(e) => {
                drop(file);
                if let Err(cleanup) = tokio::fs::remove_file(local_path).await {
                    warn!(
                        "Could not remove partial download {}: {}",
                        local_path.display(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    async fn publish(&self, key: &str, expires_in: Option<Duration>) -> BlobResult<SignedUrl> {
        let key = ObjectKey::try_from(key)?;
        let ttl = expires_in.unwrap_or(self.config.url_ttl);
        Self::check_expiration(ttl)?;

        // The signer would happily sign a URL for a missing key
        let info = match self.backend.head_object(&key).await {
            Ok(info) => info,
            Err(StorageError::ObjectNotFound { .. }) => {
                return Err(BlobError::ObjectNotFound {
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(BlobError::Storage(e)),
        };

        let url = self.backend.presign_get(&key, ttl).await?;
        debug!(
            "Published {} for {}s ({} bytes, {}, modified {})",
            key,
            ttl.as_secs(),
            info.size,
            info.content_type.as_deref().unwrap_or("unknown type"),
            info.last_modified
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "at an unknown time".to_string())
        );

        Ok(SignedUrl {
            url,
            expires_at: Utc::now() + ttl,
        })
    }

    async fn remove(&self, key_or_prefix: &str) -> BlobResult<usize> {
        if key_or_prefix.is_empty() {
            return Err(ValidationError::EmptyPrefix.into());
        }

        let page_size = self.page_size();
        let mut removed = 0;

        loop {
            let page = self
                .backend
                .list_page(key_or_prefix, None, page_size)
                .await?;
            if page.keys.is_empty() {
                break;
            }

            self.backend.delete_objects(&page.keys).await?;
            removed += page.keys.len();
            debug!(
                "Deleted {} objects under {:?}",
                page.keys.len(),
                key_or_prefix
            );

            if !page.is_truncated() {
                break;
            }
        }

        if removed > 0 {
            info!("Removed {} objects under {:?}", removed, key_or_prefix);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::storage::{ByteStream, ListPage, ObjectInfo, PutReceipt};
    use futures::StreamExt;
    use std::sync::Mutex;

    /// Backend with scripted failures
    #[derive(Default)]
    struct StubBackend {
        bucket_missing: bool,
        bucket_error: Option<StorageError>,
        create_error: Option<StorageError>,
        object_error: Option<StorageError>,
        /// Fails the body after the first chunk
        body_error: Option<StorageError>,
        created: Mutex<Vec<(String, BucketAcl)>>,
        uploads: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl BlobBackend for StubBackend {
        async fn head_bucket(&self, bucket: &BucketName) -> crate::domain::StorageResult<()> {
            if let Some(e) = &self.bucket_error {
                return Err(e.clone());
            }
            let created = self.created.lock().unwrap();
            if self.bucket_missing && created.is_empty() {
                return Err(StorageError::BucketNotFound {
                    bucket: bucket.to_string(),
                });
            }
            Ok(())
        }

        async fn create_bucket(
            &self,
            bucket: &BucketName,
            acl: BucketAcl,
        ) -> crate::domain::StorageResult<()> {
            if let Some(e) = &self.create_error {
                return Err(e.clone());
            }
            self.created
                .lock()
                .unwrap()
                .push((bucket.to_string(), acl));
            Ok(())
        }

        async fn head_object(&self, key: &ObjectKey) -> crate::domain::StorageResult<ObjectInfo> {
            Err(self
                .object_error
                .clone()
                .unwrap_or(StorageError::ObjectNotFound {
                    key: key.to_string(),
                }))
        }

        async fn put_object(
            &self,
            key: &ObjectKey,
            _data: Bytes,
            content_type: &str,
        ) -> crate::domain::StorageResult<PutReceipt> {
            if let Some(e) = &self.object_error {
                return Err(e.clone());
            }
            self.uploads
                .lock()
                .unwrap()
                .push((key.to_string(), content_type.to_string()));
            Ok(PutReceipt::default())
        }

        async fn get_object(&self, key: &ObjectKey) -> crate::domain::StorageResult<ByteStream> {
            if let Some(e) = &self.body_error {
                let chunks = vec![Ok(Bytes::from_static(b"partial body")), Err(e.clone())];
                return Ok(futures::stream::iter(chunks).boxed());
            }
            Err(self
                .object_error
                .clone()
                .unwrap_or(StorageError::ObjectNotFound {
                    key: key.to_string(),
                }))
        }

        async fn presign_get(
            &self,
            key: &ObjectKey,
            _expires_in: Duration,
        ) -> crate::domain::StorageResult<String> {
            Ok(format!("https://stub.invalid/{}", key))
        }

        async fn list_page(
            &self,
            _prefix: &str,
            _continuation: Option<&str>,
            _max_keys: usize,
        ) -> crate::domain::StorageResult<ListPage> {
            match &self.object_error {
                Some(e) => Err(e.clone()),
                None => Ok(ListPage::default()),
            }
        }

        async fn delete_objects(&self, _keys: &[String]) -> crate::domain::StorageResult<()> {
            Ok(())
        }
    }

    fn config() -> BlobStoreConfig {
        BlobStoreConfig::builder()
            .bucket(BucketName::try_from("test-bucket").unwrap())
            .build()
    }

    fn denied() -> StorageError {
        StorageError::AccessDenied {
            operation: "head".to_string(),
            message: "403 Forbidden".to_string(),
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = config();
        assert_eq!(config.url_ttl, Duration::from_secs(90));
        assert_eq!(config.content_type, "image/jpeg");
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.bucket_acl, BucketAcl::PublicRead);
    }

    #[tokio::test]
    async fn test_connect_creates_missing_bucket() {
        let backend = Arc::new(StubBackend {
            bucket_missing: true,
            ..Default::default()
        });

        let client = BlobStoreClient::connect(backend.clone(), config())
            .await
            .unwrap();

        let created = backend.created.lock().unwrap().clone();
        assert_eq!(
            created,
            vec![("test-bucket".to_string(), BucketAcl::PublicRead)]
        );
        assert!(client.does_bucket_exist(None).await);
    }

    #[tokio::test]
    async fn test_connect_skips_creation_for_existing_bucket() {
        let backend = Arc::new(StubBackend::default());

        BlobStoreClient::connect(backend.clone(), config())
            .await
            .unwrap();

        assert!(backend.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_fails_on_other_probe_errors() {
        let backend = Arc::new(StubBackend {
            bucket_error: Some(denied()),
            ..Default::default()
        });

        let result = BlobStoreClient::connect(backend.clone(), config()).await;

        assert!(matches!(
            result,
            Err(BlobError::BucketUnavailable {
                source: StorageError::AccessDenied { .. },
                ..
            })
        ));
        assert!(backend.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_fails_when_creation_fails() {
        let backend = Arc::new(StubBackend {
            bucket_missing: true,
            create_error: Some(StorageError::backend("create_bucket", "quota")),
            ..Default::default()
        });

        let result = BlobStoreClient::connect(backend, config()).await;

        assert!(matches!(result, Err(BlobError::BucketUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_existence_probes_never_raise() {
        let backend = Arc::new(StubBackend {
            object_error: Some(StorageError::Timeout {
                operation: "head_object".to_string(),
            }),
            ..Default::default()
        });
        let client = BlobStoreClient::connect(backend, config()).await.unwrap();

        assert!(!client.does_object_exist("test.jpg").await.unwrap());
        assert!(!client.does_bucket_exist(Some("Not_A_Bucket")).await);
    }

    #[tokio::test]
    async fn test_does_object_exist_rejects_invalid_key() {
        let client = BlobStoreClient::connect(Arc::new(StubBackend::default()), config())
            .await
            .unwrap();

        let result = client.does_object_exist("").await;
        assert!(matches!(
            result,
            Err(BlobError::InvalidArgument(ValidationError::EmptyObjectKey))
        ));
    }

    #[tokio::test]
    async fn test_upload_failure_is_typed() {
        let backend = Arc::new(StubBackend {
            object_error: Some(denied()),
            ..Default::default()
        });
        let client = BlobStoreClient::connect(backend, config()).await.unwrap();

        let result = client
            .upload_object(Bytes::from_static(b"data"), "images/a.png")
            .await;

        match result {
            Err(BlobError::UploadFailed { key, source }) => {
                assert_eq!(key, "images/a.png");
                assert!(matches!(source, StorageError::AccessDenied { .. }));
            }
            other => panic!("expected UploadFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_content_type_follows_extension() {
        let backend = Arc::new(StubBackend::default());
        let client = BlobStoreClient::connect(backend.clone(), config())
            .await
            .unwrap();

        client
            .upload_object(Bytes::from_static(b"png"), "images/a.PNG")
            .await
            .unwrap();
        client
            .upload_object(Bytes::from_static(b"raw"), "images/blob")
            .await
            .unwrap();

        let uploads = backend.uploads.lock().unwrap().clone();
        assert_eq!(uploads[0].1, "image/png");
        assert_eq!(uploads[1].1, "image/jpeg");
    }

    #[tokio::test]
    async fn test_publish_validates_expiration() {
        let client = BlobStoreClient::connect(Arc::new(StubBackend::default()), config())
            .await
            .unwrap();

        for ttl in [Duration::ZERO, Duration::from_millis(500), MAX_URL_TTL + Duration::from_secs(1)] {
            let result = client.publish("test.jpg", Some(ttl)).await;
            assert!(
                matches!(
                    result,
                    Err(BlobError::InvalidArgument(ValidationError::InvalidExpiration { .. }))
                ),
                "ttl {:?}",
                ttl
            );
        }
    }

    #[tokio::test]
    async fn test_publish_surfaces_probe_failures() {
        let backend = Arc::new(StubBackend {
            object_error: Some(denied()),
            ..Default::default()
        });
        let client = BlobStoreClient::connect(backend, config()).await.unwrap();

        let result = client.publish("test.jpg", None).await;
        assert!(matches!(
            result,
            Err(BlobError::Storage(StorageError::AccessDenied { .. }))
        ));
    }

    #[tokio::test]
    async fn test_download_missing_object_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing.jpg");
        let client = BlobStoreClient::connect(Arc::new(StubBackend::default()), config())
            .await
            .unwrap();

        let result = client.download_object("missing.jpg", &target).await;

        assert!(matches!(result, Err(BlobError::ObjectNotFound { .. })));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_download_failing_mid_stream_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("broken.jpg");
        let backend = Arc::new(StubBackend {
            body_error: Some(StorageError::Timeout {
                operation: "get_object".to_string(),
            }),
            ..Default::default()
        });
        let client = BlobStoreClient::connect(backend, config()).await.unwrap();

        let result = client.download_object("broken.jpg", &target).await;

        assert!(matches!(
            result,
            Err(BlobError::Storage(StorageError::Timeout { .. }))
        ));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_download_rejects_empty_path() {
        let client = BlobStoreClient::connect(Arc::new(StubBackend::default()), config())
            .await
            .unwrap();

        let result = client.download_object("test.jpg", Path::new("")).await;
        assert!(matches!(
            result,
            Err(BlobError::InvalidArgument(ValidationError::EmptyLocalPath))
        ));
    }

    #[tokio::test]
    async fn test_remove_rejects_empty_prefix_and_propagates_errors() {
        let client = BlobStoreClient::connect(Arc::new(StubBackend::default()), config())
            .await
            .unwrap();
        assert!(matches!(
            client.remove("").await,
            Err(BlobError::InvalidArgument(ValidationError::EmptyPrefix))
        ));
        assert_eq!(client.remove("nothing/").await.unwrap(), 0);

        let failing = BlobStoreClient::connect(
            Arc::new(StubBackend {
                object_error: Some(StorageError::backend("list_objects", "boom")),
                ..Default::default()
            }),
            config(),
        )
        .await
        .unwrap();
        assert!(matches!(
            failing.remove("images/").await,
            Err(BlobError::Storage(StorageError::Backend { .. }))
        ));
    }
}
