use std::path::PathBuf;
use thiserror::Error;

use super::{StorageError, ValidationError};

/// Failures surfaced by the blob-store client
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    #[error("NoSuchKey: The specified key does not exist: {key}")]
    ObjectNotFound { key: String },

    #[error("Upload of '{key}' failed: {source}")]
    UploadFailed {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Bucket '{bucket}' is unavailable: {source}")]
    BucketUnavailable {
        bucket: String,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Local file error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BlobError {
    /// Stable identifier of the error kind
    pub fn code(&self) -> &'static str {
        match self {
            BlobError::InvalidArgument(_) => "InvalidArgument",
            BlobError::ObjectNotFound { .. } => "ObjectNotFound",
            BlobError::UploadFailed { .. } => "UploadFailed",
            BlobError::BucketUnavailable { .. } => "BucketUnavailable",
            BlobError::Storage(_) => "StorageError",
            BlobError::Io { .. } => "IoError",
        }
    }
}

/// Result type for blob-store client operations
pub type BlobResult<T> = Result<T, BlobError>;
