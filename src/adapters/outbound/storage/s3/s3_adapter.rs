use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError,
    operation::{
        create_bucket::CreateBucketError, get_object::GetObjectError,
        head_bucket::HeadBucketError, head_object::HeadObjectError,
    },
    presigning::PresigningConfig,
    primitives::ByteStream as AwsByteStream,
    types::{
        BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration, Delete,
        ObjectIdentifier, ObjectOwnership,
    },
    Client,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{stream, StreamExt};
use tracing::{debug, warn};

use super::{create_s3_client, S3Config};
use crate::{
    adapters::outbound::storage::error::from_sdk_error,
    domain::{
        errors::{StorageError, StorageResult},
        models::BucketAcl,
        value_objects::{BucketName, ObjectKey},
    },
    ports::storage::{BlobBackend, ByteStream, ListPage, ObjectInfo, PutReceipt},
};

const US_EAST_1: &str = "us-east-1";

/// S3 backend bound to one bucket
#[derive(Debug, Clone)]
pub struct S3BlobBackend {
    client: Client,
    bucket: BucketName,
    region: String,
}

impl S3BlobBackend {
    pub fn new(client: Client, bucket: BucketName, region: impl Into<String>) -> Self {
        Self {
            client,
            bucket,
            region: region.into(),
        }
    }

    /// Build the SDK client and bind it to the configured bucket
    pub async fn from_config(config: &S3Config) -> Self {
        let client = create_s3_client(config).await;
        Self::new(
            client,
            config.bucket.name.clone(),
            config.bucket.region.clone(),
        )
    }

    fn canned_acl(acl: BucketAcl) -> BucketCannedAcl {
        match acl {
            BucketAcl::Private => BucketCannedAcl::Private,
            BucketAcl::PublicRead => BucketCannedAcl::PublicRead,
        }
    }

    fn to_chrono(timestamp: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
    }

    fn body_stream(body: AwsByteStream) -> ByteStream {
        stream::try_unfold(body, |mut body| async move {
            let chunk = body
                .try_next()
                .await
                .map_err(|e| StorageError::backend("get_object", e))?;
            Ok::<_, StorageError>(chunk.map(|chunk| (chunk, body)))
        })
        .boxed()
    }
}

#[async_trait]
impl BlobBackend for S3BlobBackend {
    async fn head_bucket(&self, bucket: &BucketName) -> StorageResult<()> {
        match self
            .client
            .head_bucket()
            .bucket(bucket.as_str())
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(SdkError::ServiceError(ref service_err))
                if matches!(service_err.err(), HeadBucketError::NotFound(_)) =>
            {
                Err(StorageError::BucketNotFound {
                    bucket: bucket.to_string(),
                })
            }
            Err(e) => Err(from_sdk_error("head_bucket", e)),
        }
    }

    async fn create_bucket(&self, bucket: &BucketName, acl: BucketAcl) -> StorageResult<()> {
        let mut request = self
            .client
            .create_bucket()
            .bucket(bucket.as_str())
            .acl(Self::canned_acl(acl));

        // us-east-1 rejects an explicit location constraint
        if self.region != US_EAST_1 {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        // Canned ACLs are ignored on buckets that enforce owner-only ownership
        if acl == BucketAcl::PublicRead {
            request = request.object_ownership(ObjectOwnership::ObjectWriter);
        }

        match request.send().await {
            Ok(_) => Ok(()),
            Err(SdkError::ServiceError(ref service_err))
                if matches!(
                    service_err.err(),
                    CreateBucketError::BucketAlreadyOwnedByYou(_)
                ) =>
            {
                debug!("Bucket {} already owned by this account", bucket);
                Ok(())
            }
            Err(e) => Err(from_sdk_error("create_bucket", e)),
        }
    }

    async fn head_object(&self, key: &ObjectKey) -> StorageResult<ObjectInfo> {
        let output = match self
            .client
            .head_object()
            .bucket(self.bucket.as_str())
            .key(key.as_str())
            .send()
            .await
        {
            Ok(output) => output,
            Err(SdkError::ServiceError(ref service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
            {
                return Err(StorageError::ObjectNotFound {
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(from_sdk_error("head_object", e)),
        };

        Ok(ObjectInfo {
            key: key.clone(),
            size: output.content_length().unwrap_or_default().max(0) as u64,
            etag: output.e_tag().map(str::to_string),
            last_modified: output.last_modified().and_then(Self::to_chrono),
            content_type: output.content_type().map(str::to_string),
        })
    }

    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<PutReceipt> {
        let output = self
            .client
            .put_object()
            .bucket(self.bucket.as_str())
            .key(key.as_str())
            .content_type(content_type)
            .body(AwsByteStream::from(data))
            .send()
            .await
            .map_err(|e| from_sdk_error("put_object", e))?;

        Ok(PutReceipt {
            etag: output.e_tag().map(str::to_string),
            version_id: output.version_id().map(str::to_string),
        })
    }

    async fn get_object(&self, key: &ObjectKey) -> StorageResult<ByteStream> {
        let output = match self
            .client
            .get_object()
            .bucket(self.bucket.as_str())
            .key(key.as_str())
            .send()
            .await
        {
            Ok(output) => output,
            Err(SdkError::ServiceError(ref service_err))
                if matches!(service_err.err(), GetObjectError::NoSuchKey(_)) =>
            {
                return Err(StorageError::ObjectNotFound {
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(from_sdk_error("get_object", e)),
        };

        Ok(Self::body_stream(output.body))
    }

    async fn presign_get(&self, key: &ObjectKey, expires_in: Duration) -> StorageResult<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::backend("presign_get", e))?;

        let request = self
            .client
            .get_object()
            .bucket(self.bucket.as_str())
            .key(key.as_str())
            .presigned(presigning)
            .await
            .map_err(|e| from_sdk_error("presign_get", e))?;

        Ok(request.uri().to_string())
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<ListPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(self.bucket.as_str())
            .prefix(prefix)
            .max_keys(i32::try_from(max_keys).unwrap_or(i32::MAX))
            .set_continuation_token(continuation.map(str::to_string))
            .send()
            .await
            .map_err(|e| from_sdk_error("list_objects", e))?;

        let keys = output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();

        let next_token = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ListPage { keys, next_token })
    }

    async fn delete_objects(&self, keys: &[String]) -> StorageResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::backend("delete_objects", e))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(true)
            .build()
            .map_err(|e| StorageError::backend("delete_objects", e))?;

        let output = self
            .client
            .delete_objects()
            .bucket(self.bucket.as_str())
            .delete(delete)
            .send()
            .await
            .map_err(|e| from_sdk_error("delete_objects", e))?;

        if let Some(first) = output.errors().first() {
            warn!(
                "{} keys could not be deleted from {}",
                output.errors().len(),
                self.bucket
            );
            return Err(StorageError::backend(
                "delete_objects",
                format!(
                    "{}: {}",
                    first.key().unwrap_or("<unknown key>"),
                    first.message().unwrap_or("unknown error")
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BucketConfig, Credentials};

    async fn offline_backend() -> S3BlobBackend {
        let bucket = BucketName::try_from("test-bucket").unwrap();
        let mut config = S3Config::new(
            BucketConfig::new(bucket, "eu-west-1")
                .with_credentials(Credentials::new("AKIDEXAMPLE", "secret")),
        );
        config.endpoint = Some("http://localhost:9000".to_string());
        config.force_path_style = true;
        S3BlobBackend::from_config(&config).await
    }

    #[test]
    fn test_canned_acl_mapping() {
        assert_eq!(
            S3BlobBackend::canned_acl(BucketAcl::PublicRead),
            BucketCannedAcl::PublicRead
        );
        assert_eq!(
            S3BlobBackend::canned_acl(BucketAcl::Private),
            BucketCannedAcl::Private
        );
    }

    #[tokio::test]
    async fn test_presign_is_local() {
        // Signing needs no network round-trip
        let backend = offline_backend().await;
        let key = ObjectKey::try_from("images/a.jpg").unwrap();

        let url = backend
            .presign_get(&key, Duration::from_secs(90))
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:9000/test-bucket/images/a.jpg?"));
        assert!(url.contains("X-Amz-Expires=90"));
        assert!(url.contains("X-Amz-Signature="));
    }
}
