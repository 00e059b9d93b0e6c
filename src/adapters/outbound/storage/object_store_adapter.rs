use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt, TryStreamExt};
use object_store::{
    memory::InMemory, path::Path as ObjectPath, signer::Signer, Attribute, AttributeValue,
    Attributes, ObjectMeta, ObjectStore, PutOptions, PutPayload,
};
use percent_encoding::percent_decode_str;

use super::error::from_object_store;
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::BucketAcl,
        value_objects::{BucketName, ObjectKey},
    },
    ports::storage::{BlobBackend, ByteStream, ListPage, ObjectInfo, PutReceipt},
};

/// Backend over any `object_store` implementation, bound to one bucket
///
/// Used with the in-memory store for development and tests. URL signing is
/// only available when a signer is attached.
#[derive(Debug, Clone)]
pub struct ObjectStoreBackend {
    inner: Arc<dyn ObjectStore>,
    bucket: BucketName,
    signer: Option<Arc<dyn Signer>>,
}

impl ObjectStoreBackend {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: BucketName) -> Self {
        Self {
            inner: store,
            bucket,
            signer: None,
        }
    }

    /// Backend over a fresh in-memory store
    pub fn in_memory(bucket: BucketName) -> Self {
        Self::new(Arc::new(InMemory::new()), bucket)
    }

    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    fn path(key: &ObjectKey) -> ObjectPath {
        ObjectPath::from(key.as_str())
    }

    /// Key as stored by the caller; `object_store` percent-encodes locations
    fn raw_key(location: &ObjectPath) -> StorageResult<String> {
        let encoded: &str = location.as_ref();
        percent_decode_str(encoded)
            .decode_utf8()
            .map(|key| key.into_owned())
            .map_err(|e| StorageError::backend("list_objects", e))
    }

    /// Directory to list so that every key starting with `prefix` is seen
    fn listing_root(prefix: &str) -> Option<ObjectPath> {
        prefix
            .rfind('/')
            .map(|idx| &prefix[..idx])
            .filter(|dir| !dir.is_empty())
            .map(ObjectPath::from)
    }
}

#[async_trait]
impl BlobBackend for ObjectStoreBackend {
    async fn head_bucket(&self, bucket: &BucketName) -> StorageResult<()> {
        if bucket == &self.bucket {
            Ok(())
        } else {
            Err(StorageError::BucketNotFound {
                bucket: bucket.to_string(),
            })
        }
    }

    async fn create_bucket(&self, bucket: &BucketName, _acl: BucketAcl) -> StorageResult<()> {
        if bucket == &self.bucket {
            return Ok(());
        }
        Err(StorageError::unsupported(
            "create_bucket",
            "this store holds a single bucket",
        ))
    }

    async fn head_object(&self, key: &ObjectKey) -> StorageResult<ObjectInfo> {
        let meta = self
            .inner
            .head(&Self::path(key))
            .await
            .map_err(|e| from_object_store("head_object", e))?;

        Ok(ObjectInfo {
            key: key.clone(),
            size: meta.size,
            etag: meta.e_tag,
            last_modified: Some(meta.last_modified),
            content_type: None,
        })
    }

    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<PutReceipt> {
        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let result = self
            .inner
            .put_opts(&Self::path(key), PutPayload::from(data), options)
            .await
            .map_err(|e| from_object_store("put_object", e))?;

        Ok(PutReceipt {
            etag: result.e_tag,
            version_id: result.version,
        })
    }

    async fn get_object(&self, key: &ObjectKey) -> StorageResult<ByteStream> {
        let result = self
            .inner
            .get(&Self::path(key))
            .await
            .map_err(|e| from_object_store("get_object", e))?;

        Ok(result
            .into_stream()
            .map_err(|e| from_object_store("get_object", e))
            .boxed())
    }

    async fn presign_get(&self, key: &ObjectKey, expires_in: Duration) -> StorageResult<String> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            StorageError::unsupported("presign_get", "no URL signer configured for this store")
        })?;

        let url = signer
            .signed_url(http::Method::GET, &Self::path(key), expires_in)
            .await
            .map_err(|e| from_object_store("presign_get", e))?;

        Ok(url.to_string())
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<ListPage> {
        let root = Self::listing_root(prefix);
        let listing = match continuation {
            Some(token) => self
                .inner
                .list_with_offset(root.as_ref(), &ObjectPath::from(token)),
            None => self.inner.list(root.as_ref()),
        };

        let metas: Vec<ObjectMeta> = listing
            .try_collect()
            .await
            .map_err(|e| from_object_store("list_objects", e))?;

        // Offsets compare encoded locations, so pages follow that order
        let mut locations = Vec::with_capacity(metas.len());
        for meta in metas {
            let key = Self::raw_key(&meta.location)?;
            if key.starts_with(prefix) {
                locations.push((key, meta.location));
            }
        }
        locations.sort_by(|a, b| a.1.cmp(&b.1));

        let truncated = locations.len() > max_keys;
        locations.truncate(max_keys);
        let keys: Vec<String> = locations.into_iter().map(|(key, _)| key).collect();
        let next_token = if truncated { keys.last().cloned() } else { None };

        Ok(ListPage { keys, next_token })
    }

    async fn delete_objects(&self, keys: &[String]) -> StorageResult<()> {
        let locations = stream::iter(
            keys.iter()
                .map(|key| Ok::<_, object_store::Error>(ObjectPath::from(key.as_str()))),
        )
        .boxed();

        self.inner
            .delete_stream(locations)
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| from_object_store("delete_objects", e))?;

        Ok(())
    }
}
