use std::{path::Path, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{
    errors::BlobResult,
    models::{BlobHandle, SignedUrl},
    value_objects::BucketName,
};

/// Port for blob-store operations used by the HTTP layer and the CLI
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Bucket this store is bound to
    fn bucket(&self) -> &BucketName;

    /// Check whether a bucket exists (the configured one when `None`).
    /// Never fails: errors are reported as `false`.
    async fn does_bucket_exist(&self, bucket: Option<&str>) -> bool;

    /// Check whether an object exists. Only an invalid key is an error.
    async fn does_object_exist(&self, key: &str) -> BlobResult<bool>;

    /// Upload raw content to `key`, creating or overwriting it
    async fn upload_object(&self, content: Bytes, key: &str) -> BlobResult<BlobHandle>;

    /// Download the object at `key` into `local_path`
    async fn download_object(&self, key: &str, local_path: &Path) -> BlobResult<()>;

    /// Produce a signed GET URL; `None` uses the configured default TTL
    async fn publish(&self, key: &str, expires_in: Option<Duration>) -> BlobResult<SignedUrl>;

    /// Delete every object whose key starts with `key_or_prefix`.
    /// Returns the number of deleted objects.
    async fn remove(&self, key_or_prefix: &str) -> BlobResult<usize>;
}
