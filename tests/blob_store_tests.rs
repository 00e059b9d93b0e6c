use bytes::Bytes;
use image_bucket::{
    create_in_memory_app, BlobError, BlobStore, BlobStoreClient, BlobStoreConfig, BucketName,
    ObjectStoreBackend,
};
use object_store::aws::AmazonS3Builder;
use std::{sync::Arc, time::Duration};

const CONTENT: &[u8] = b"\xff\xd8\xff\xe0 not really a jpeg";

/// Client over a fresh in-memory bucket that can sign URLs offline
async fn signing_store(page_size: usize) -> BlobStoreClient {
    let bucket = BucketName::try_from("test-bucket").unwrap();
    let signer = AmazonS3Builder::new()
        .with_bucket_name("test-bucket")
        .with_region("us-east-1")
        .with_access_key_id("AKIDEXAMPLE")
        .with_secret_access_key("secret")
        .build()
        .unwrap();
    let backend = ObjectStoreBackend::in_memory(bucket.clone()).with_signer(Arc::new(signer));
    let config = BlobStoreConfig::builder()
        .bucket(bucket)
        .page_size(page_size)
        .build();

    BlobStoreClient::connect(Arc::new(backend), config)
        .await
        .unwrap()
}

#[tokio::test]
async fn unwritten_keys_do_not_exist() {
    let store = signing_store(1000).await;

    for key in ["test.jpg", "folder1/test.jpg", "images/never.png"] {
        assert!(!store.does_object_exist(key).await.unwrap(), "{}", key);
    }
}

#[tokio::test]
async fn uploaded_keys_exist() {
    let store = signing_store(1000).await;

    let handle = store
        .upload_object(Bytes::from_static(CONTENT), "images/photo.jpg")
        .await
        .unwrap();

    assert_eq!(handle.key.as_str(), "images/photo.jpg");
    assert_eq!(handle.size, CONTENT.len() as u64);
    assert!(store.does_object_exist("images/photo.jpg").await.unwrap());
}

#[tokio::test]
async fn upload_overwrites() {
    let store = signing_store(1000).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.jpg");

    store
        .upload_object(Bytes::from_static(b"first"), "test.jpg")
        .await
        .unwrap();
    store
        .upload_object(Bytes::from_static(b"second"), "test.jpg")
        .await
        .unwrap();
    store.download_object("test.jpg", &path).await.unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"second");
}

#[tokio::test]
async fn publish_missing_object_fails() {
    let store = signing_store(1000).await;

    let result = store.publish("missing.jpg", None).await;

    match result {
        Err(BlobError::ObjectNotFound { key }) => assert_eq!(key, "missing.jpg"),
        other => panic!("expected ObjectNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn publish_existing_object() {
    let store = signing_store(1000).await;
    store
        .upload_object(Bytes::from_static(CONTENT), "images/a.jpg")
        .await
        .unwrap();

    let before = chrono::Utc::now();
    let signed = store.publish("images/a.jpg", None).await.unwrap();

    assert!(signed.url.contains("images/a.jpg"));
    assert!(signed.url.contains("X-Amz-Expires=90"));
    assert!(!signed.is_expired());
    let ttl = signed.expires_at - before;
    assert!(ttl.num_seconds() >= 89 && ttl.num_seconds() <= 91);

    let custom = store
        .publish("images/a.jpg", Some(Duration::from_secs(3600)))
        .await
        .unwrap();
    assert!(custom.url.contains("X-Amz-Expires=3600"));
}

#[tokio::test]
async fn download_round_trip() {
    let store = signing_store(1000).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("downloaded.jpg");

    store
        .upload_object(Bytes::from_static(CONTENT), "test.jpg")
        .await
        .unwrap();
    store.download_object("test.jpg", &path).await.unwrap();

    assert!(path.exists());
    assert_eq!(std::fs::read(&path).unwrap(), CONTENT);
}

#[tokio::test]
async fn download_missing_object_writes_no_file() {
    let store = signing_store(1000).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.jpg");

    let result = store.download_object("missing.jpg", &path).await;

    assert!(matches!(result, Err(BlobError::ObjectNotFound { .. })));
    assert!(!path.exists());
}

#[tokio::test]
async fn download_into_missing_directory_is_an_io_error() {
    let store = signing_store(1000).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/file.jpg");
    store
        .upload_object(Bytes::from_static(CONTENT), "test.jpg")
        .await
        .unwrap();

    let result = store.download_object("test.jpg", &path).await;

    assert!(matches!(result, Err(BlobError::Io { .. })));
}

#[tokio::test]
async fn upload_exists_remove_scenario() {
    let store = signing_store(1000).await;

    store
        .upload_object(Bytes::from_static(CONTENT), "test.jpg")
        .await
        .unwrap();
    assert!(store.does_object_exist("test.jpg").await.unwrap());

    assert_eq!(store.remove("test.jpg").await.unwrap(), 1);
    assert!(!store.does_object_exist("test.jpg").await.unwrap());
}

#[tokio::test]
async fn remove_only_touches_the_prefix() {
    let store = signing_store(1000).await;

    store
        .upload_object(Bytes::from_static(CONTENT), "folder1/test.jpg")
        .await
        .unwrap();
    store
        .upload_object(Bytes::from_static(CONTENT), "test.jpg")
        .await
        .unwrap();

    assert_eq!(store.remove("folder1/").await.unwrap(), 1);

    assert!(!store.does_object_exist("folder1/test.jpg").await.unwrap());
    assert!(store.does_object_exist("test.jpg").await.unwrap());
}

#[tokio::test]
async fn remove_spans_listing_pages_and_is_idempotent() {
    // Three objects per listing page
    let store = signing_store(3).await;

    for i in 0..10 {
        store
            .upload_object(Bytes::from_static(CONTENT), &format!("batch/{:02}.png", i))
            .await
            .unwrap();
    }
    store
        .upload_object(Bytes::from_static(CONTENT), "batchless.png")
        .await
        .unwrap();

    assert_eq!(store.remove("batch/").await.unwrap(), 10);
    for i in 0..10 {
        let key = format!("batch/{:02}.png", i);
        assert!(!store.does_object_exist(&key).await.unwrap(), "{}", key);
    }
    assert!(store.does_object_exist("batchless.png").await.unwrap());

    assert_eq!(store.remove("batch/").await.unwrap(), 0);
}

#[tokio::test]
async fn remove_uses_string_prefixes() {
    let store = signing_store(1000).await;

    for key in ["img/a.png", "img2/b.png", "imgx.png", "other.png"] {
        store
            .upload_object(Bytes::from_static(CONTENT), key)
            .await
            .unwrap();
    }

    assert_eq!(store.remove("img").await.unwrap(), 3);
    assert!(store.does_object_exist("other.png").await.unwrap());
}

#[tokio::test]
async fn bucket_probes() {
    let app = create_in_memory_app("test-bucket").await.unwrap();
    let store = app.blob_store;

    assert!(store.does_bucket_exist(None).await);
    assert!(store.does_bucket_exist(Some("test-bucket")).await);
    assert!(!store.does_bucket_exist(Some("some-other-bucket")).await);
    assert!(!store.does_bucket_exist(Some("")).await);
}

#[tokio::test]
async fn invalid_arguments_are_rejected() {
    let store = signing_store(1000).await;

    assert!(matches!(
        store.upload_object(Bytes::new(), "").await,
        Err(BlobError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.publish("/leading-slash.jpg", None).await,
        Err(BlobError::InvalidArgument(_))
    ));
    assert!(matches!(
        store
            .publish("test.jpg", Some(Duration::from_secs(8 * 24 * 60 * 60)))
            .await,
        Err(BlobError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.remove("").await,
        Err(BlobError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn publish_without_signer_is_a_storage_error() {
    let bucket = BucketName::try_from("test-bucket").unwrap();
    let backend = ObjectStoreBackend::in_memory(bucket.clone());
    let config = BlobStoreConfig::builder().bucket(bucket).build();
    let store = BlobStoreClient::connect(Arc::new(backend), config)
        .await
        .unwrap();
    store
        .upload_object(Bytes::from_static(CONTENT), "a.jpg")
        .await
        .unwrap();

    let result = store.publish("a.jpg", None).await;

    assert!(matches!(result, Err(BlobError::Storage(_))));
}

#[tokio::test]
async fn remove_handles_keys_with_escaped_characters() {
    let store = signing_store(2).await;

    for key in ["shots/a[1].jpg", "shots/a[2].jpg", "shots/a[3].jpg", "b%20c.jpg", "b c.jpg"] {
        store
            .upload_object(Bytes::from_static(CONTENT), key)
            .await
            .unwrap();
    }

    assert_eq!(store.remove("shots/a[").await.unwrap(), 3);
    assert!(!store.does_object_exist("shots/a[1].jpg").await.unwrap());

    assert_eq!(store.remove("b%20c.jpg").await.unwrap(), 1);
    assert!(!store.does_object_exist("b%20c.jpg").await.unwrap());
    assert!(store.does_object_exist("b c.jpg").await.unwrap());
}
