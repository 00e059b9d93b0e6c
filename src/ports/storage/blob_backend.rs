use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use crate::domain::{
    errors::StorageResult,
    models::BucketAcl,
    value_objects::{BucketName, ObjectKey},
};

/// Streamed object body
pub type ByteStream = BoxStream<'static, StorageResult<Bytes>>;

/// Port for the remote object store
/// Each adapter is bound to one bucket for object operations.
#[async_trait]
pub trait BlobBackend: Send + Sync + 'static {
    /// Lightweight existence probe for a bucket
    async fn head_bucket(&self, bucket: &BucketName) -> StorageResult<()>;

    /// Create a bucket with the given canned ACL
    async fn create_bucket(&self, bucket: &BucketName, acl: BucketAcl) -> StorageResult<()>;

    /// Fetch object metadata without the body
    async fn head_object(&self, key: &ObjectKey) -> StorageResult<ObjectInfo>;

    /// Store object data, replacing any existing object at `key`
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<PutReceipt>;

    /// Open the object body as a stream. Not-found is reported before any
    /// chunk is produced.
    async fn get_object(&self, key: &ObjectKey) -> StorageResult<ByteStream>;

    /// Sign a GET URL for the object
    async fn presign_get(&self, key: &ObjectKey, expires_in: Duration) -> StorageResult<String>;

    /// List one page of keys starting with `prefix` (plain string prefix)
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<ListPage>;

    /// Delete a batch of keys
    async fn delete_objects(&self, keys: &[String]) -> StorageResult<()>;
}

/// Information about an object in storage
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub key: ObjectKey,
    pub size: u64,
    pub etag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
}

/// Store-assigned metadata of a completed write
#[derive(Debug, Clone, Default)]
pub struct PutReceipt {
    pub etag: Option<String>,
    pub version_id: Option<String>,
}

/// One page of a prefix listing
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub keys: Vec<String>,
    pub next_token: Option<String>,
}

impl ListPage {
    /// More keys exist beyond this page
    pub fn is_truncated(&self) -> bool {
        self.next_token.is_some()
    }
}
