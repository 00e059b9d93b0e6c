mod blob_store_client;

pub use blob_store_client::{
    BlobStoreClient, BlobStoreConfig, DEFAULT_CONTENT_TYPE, DEFAULT_URL_TTL, MAX_PAGE_SIZE,
    MAX_URL_TTL,
};
