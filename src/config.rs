//! Command-line and environment configuration shared by the binaries

use clap::Args;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    app::{AppConfig, AppError, StorageBackend},
    adapters::{
        inbound::http::UploadSettings,
        outbound::storage::s3::{DEFAULT_MAX_ATTEMPTS, DEFAULT_OPERATION_TIMEOUT},
    },
    domain::{
        models::{BucketAcl, BucketConfig, Credentials},
        value_objects::BucketName,
    },
    services::DEFAULT_URL_TTL,
};

/// Blob-store connection settings
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Bucket holding the objects
    #[arg(long, env = "BUCKET_NAME")]
    pub bucket: String,

    /// Region of the bucket
    #[arg(long, env = "REGION", default_value = "us-east-1")]
    pub region: String,

    /// Access key id; the default AWS credential chain is used when unset
    #[arg(long, env = "ACCESS_KEY_ID")]
    pub access_key_id: Option<String>,

    #[arg(long, env = "SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// Endpoint of an S3-compatible server (MinIO, LocalStack)
    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Address buckets by path instead of by host name
    #[arg(long, env = "S3_FORCE_PATH_STYLE", default_value_t = false)]
    pub s3_force_path_style: bool,

    /// Storage backend type (s3 or memory)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "s3")]
    pub storage_backend: String,

    /// Lifetime of published URLs, in seconds
    #[arg(long, env = "URL_TTL_SECS", default_value_t = DEFAULT_URL_TTL.as_secs())]
    pub url_ttl_secs: u64,

    /// Canned ACL applied when the bucket has to be created
    #[arg(long, env = "BUCKET_ACL", default_value = "public-read")]
    pub bucket_acl: BucketAcl,

    /// Deadline of one remote call, retries included
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_OPERATION_TIMEOUT.as_secs())]
    pub request_timeout_secs: u64,
}

impl StoreArgs {
    pub fn bucket_config(&self) -> Result<BucketConfig, AppError> {
        let name = BucketName::try_from(self.bucket.as_str()).map_err(|e| {
            AppError::Configuration {
                message: format!("invalid bucket name '{}': {}", self.bucket, e),
            }
        })?;

        let mut config = BucketConfig::new(name, self.region.clone());
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access_key), Some(secret_key)) => {
                config = config.with_credentials(Credentials::new(access_key, secret_key));
            }
            (None, None) => {}
            _ => {
                return Err(AppError::Configuration {
                    message: "ACCESS_KEY_ID and SECRET_ACCESS_KEY must be set together"
                        .to_string(),
                });
            }
        }

        Ok(config)
    }

    pub fn storage_backend(&self) -> Result<StorageBackend, AppError> {
        match self.storage_backend.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::InMemory),
            "s3" => Ok(StorageBackend::S3 {
                endpoint: self.s3_endpoint.clone(),
                force_path_style: self.s3_force_path_style,
                operation_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
                max_attempts: DEFAULT_MAX_ATTEMPTS,
            }),
            other => Err(AppError::Configuration {
                message: format!("Unknown storage backend: {}", other),
            }),
        }
    }

    /// Application configuration with the given upload route settings
    pub fn to_app_config(&self, upload: UploadSettings) -> Result<AppConfig, AppError> {
        Ok(AppConfig {
            bucket: self.bucket_config()?,
            storage_backend: self.storage_backend()?,
            url_ttl: Duration::from_secs(self.url_ttl_secs),
            bucket_acl: self.bucket_acl,
            upload,
        })
    }
}

/// Load `.env` from the parent directory, falling back to the working one
pub fn load_dotenv() {
    if dotenvy::from_filename("../.env").is_err() {
        dotenvy::dotenv().ok();
    }
}

/// Install the global subscriber; `RUST_LOG` wins over `level` when set
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_target(false).init();
}
