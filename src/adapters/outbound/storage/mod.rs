pub mod error;
pub mod object_store_adapter;
pub mod s3;

pub use object_store_adapter::ObjectStoreBackend;
pub use s3::{create_s3_client, S3BlobBackend, S3Config};
