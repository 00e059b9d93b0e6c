//! S3 storage backend on the AWS SDK
//!
//! Works against AWS and against S3-compatible servers such as MinIO when an
//! endpoint is set (usually together with path-style addressing).

pub mod s3_adapter;

pub use s3_adapter::S3BlobBackend;

use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_sdk_s3::{config::Credentials as AwsCredentials, Client};

use crate::domain::models::BucketConfig;

/// Default bound on a single remote call, retries included
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Configuration for the S3 storage backend
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: BucketConfig,
    pub endpoint: Option<String>,
    pub force_path_style: bool,
    pub operation_timeout: Duration,
    /// Attempts per call made by the SDK, the first one included
    pub max_attempts: u32,
}

impl S3Config {
    pub fn new(bucket: BucketConfig) -> Self {
        Self {
            bucket,
            endpoint: None,
            force_path_style: false,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Create an S3 client from configuration
///
/// Static credentials are used when present; otherwise the default provider
/// chain (environment, profile, instance metadata) resolves them.
pub async fn create_s3_client(config: &S3Config) -> Client {
    let retry_config = RetryConfig::standard()
        .with_max_attempts(config.max_attempts.max(1))
        .with_initial_backoff(Duration::from_millis(50));

    let timeout_config = TimeoutConfig::builder()
        .operation_timeout(config.operation_timeout)
        .build();

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.bucket.region.clone()))
        .retry_config(retry_config)
        .timeout_config(timeout_config);

    if let Some(credentials) = &config.bucket.credentials {
        loader = loader.credentials_provider(AwsCredentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            "static",
        ));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;

    Client::from_conf(
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build(),
    )
}
