use object_store::{aws::AmazonS3Builder, signer::Signer};
use std::{sync::Arc, time::Duration};
use tracing::info;

use crate::{
    adapters::{
        inbound::http::{AppState, UploadSettings},
        outbound::storage::{
            s3::{S3Config, DEFAULT_MAX_ATTEMPTS, DEFAULT_OPERATION_TIMEOUT},
            ObjectStoreBackend, S3BlobBackend,
        },
    },
    domain::{
        errors::BlobError,
        models::{BucketAcl, BucketConfig, Credentials},
        value_objects::BucketName,
    },
    ports::storage::BlobBackend,
    services::{BlobStoreClient, BlobStoreConfig, DEFAULT_URL_TTL, MAX_URL_TTL},
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bucket: BucketConfig,
    pub storage_backend: StorageBackend,
    pub url_ttl: Duration,
    pub bucket_acl: BucketAcl,
    pub upload: UploadSettings,
}

impl AppConfig {
    pub fn new(bucket: BucketConfig) -> Self {
        Self {
            bucket,
            storage_backend: StorageBackend::default(),
            url_ttl: DEFAULT_URL_TTL,
            bucket_acl: BucketAcl::default(),
            upload: UploadSettings::default(),
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    InMemory,
    S3 {
        endpoint: Option<String>,
        force_path_style: bool,
        operation_timeout: Duration,
        max_attempts: u32,
    },
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::S3 {
            endpoint: None,
            force_path_style: false,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Application services container
pub struct AppServices {
    pub blob_store: Arc<BlobStoreClient>,
    pub upload: UploadSettings,
}

impl AppServices {
    /// State for the HTTP router
    pub fn into_state(self) -> AppState {
        AppState {
            blob_store: self.blob_store,
            upload: Arc::new(self.upload),
        }
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl AppBuilder {
    /// Create a new application builder for the given bucket
    pub fn new(bucket: BucketConfig) -> Self {
        Self {
            config: AppConfig::new(bucket),
            signer: None,
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// URL signer for the in-memory backend
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    async fn build_backend(&self) -> Result<Arc<dyn BlobBackend>, AppError> {
        let bucket = &self.config.bucket;

        let backend: Arc<dyn BlobBackend> = match &self.config.storage_backend {
            StorageBackend::InMemory => {
                let signer = match &self.signer {
                    Some(signer) => signer.clone(),
                    None => offline_signer(bucket)?,
                };
                Arc::new(ObjectStoreBackend::in_memory(bucket.name.clone()).with_signer(signer))
            }
            StorageBackend::S3 {
                endpoint,
                force_path_style,
                operation_timeout,
                max_attempts,
            } => {
                let s3_config = S3Config {
                    bucket: bucket.clone(),
                    endpoint: endpoint.clone(),
                    force_path_style: *force_path_style,
                    operation_timeout: *operation_timeout,
                    max_attempts: *max_attempts,
                };
                Arc::new(S3BlobBackend::from_config(&s3_config).await)
            }
        };

        Ok(backend)
    }

    /// Build the complete application: backend, bucket bootstrap and client
    pub async fn build(self) -> Result<AppServices, AppError> {
        let backend = self.build_backend().await?;
        let config = self.config;

        if config.url_ttl.as_secs() == 0 || config.url_ttl > MAX_URL_TTL {
            return Err(AppError::Configuration {
                message: format!(
                    "URL lifetime must be between 1 and {} seconds",
                    MAX_URL_TTL.as_secs()
                ),
            });
        }

        let client_config = BlobStoreConfig::builder()
            .bucket(config.bucket.name.clone())
            .url_ttl(config.url_ttl)
            .bucket_acl(config.bucket_acl)
            .build();

        let client = BlobStoreClient::connect(backend, client_config).await?;
        info!(
            "Blob store ready on bucket {} ({})",
            config.bucket.name, config.bucket.region
        );

        Ok(AppServices {
            blob_store: Arc::new(client),
            upload: config.upload,
        })
    }
}

/// Signs URLs for the in-memory store the way S3 would for this bucket.
/// Nothing is fetched, so placeholder keys are used when none are configured.
fn offline_signer(bucket: &BucketConfig) -> Result<Arc<dyn Signer>, AppError> {
    let credentials = bucket
        .credentials
        .clone()
        .unwrap_or_else(|| Credentials::new("local-access-key", "local-secret-key"));

    let signer = AmazonS3Builder::new()
        .with_bucket_name(bucket.name.as_str())
        .with_region(&bucket.region)
        .with_access_key_id(credentials.access_key_id)
        .with_secret_access_key(credentials.secret_access_key)
        .build()
        .map_err(|e| AppError::Configuration {
            message: format!("cannot build URL signer: {}", e),
        })?;

    Ok(Arc::new(signer))
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {0}")]
    StorageInit(#[from] BlobError),
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub async fn create_in_memory_app(bucket: &str) -> Result<AppServices, AppError> {
    let name = BucketName::try_from(bucket).map_err(|e| AppError::Configuration {
        message: format!("invalid bucket name '{}': {}", bucket, e),
    })?;

    AppBuilder::new(BucketConfig::new(name, "us-east-1"))
        .with_storage_backend(StorageBackend::InMemory)
        .build()
        .await
}

/// Create an S3-backed application; `endpoint` targets S3-compatible servers
pub async fn create_s3_app(
    bucket: BucketConfig,
    endpoint: Option<String>,
) -> Result<AppServices, AppError> {
    let force_path_style = endpoint.is_some();

    AppBuilder::new(bucket)
        .with_storage_backend(StorageBackend::S3 {
            endpoint,
            force_path_style,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
        .build()
        .await
}
