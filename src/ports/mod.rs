pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use services::BlobStore;
pub use storage::{BlobBackend, ByteStream, ListPage, ObjectInfo, PutReceipt};
