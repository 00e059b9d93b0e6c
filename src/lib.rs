pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - value objects, models and errors
pub use domain::{
    // Errors
    BlobError,
    BlobResult,
    // Models
    BlobHandle,
    BucketAcl,
    BucketConfig,
    // Value objects
    BucketName,
    Credentials,
    ImageFormat,
    ObjectKey,
    SignedUrl,
    StorageError,
    StorageResult,
    ValidationError,
};

// Port types - interfaces for external systems
pub use ports::{BlobBackend, BlobStore, ByteStream, ListPage, ObjectInfo, PutReceipt};

// Service implementations
pub use services::{BlobStoreClient, BlobStoreConfig};

// Application factory and configuration
pub use app::{
    create_in_memory_app, create_s3_app, AppBuilder, AppConfig, AppError, AppServices,
    StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{ObjectStoreBackend, S3BlobBackend, S3Config};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, create_s3_app, AppBuilder, AppServices, BlobError, BlobStore,
        BlobStoreClient, BlobStoreConfig, BucketConfig, BucketName, ObjectKey, ObjectStoreBackend,
        S3BlobBackend, SignedUrl,
    };
}
