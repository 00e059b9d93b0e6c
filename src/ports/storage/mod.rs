mod blob_backend;

pub use blob_backend::{BlobBackend, ByteStream, ListPage, ObjectInfo, PutReceipt};
