/// Errors reported by a storage backend
///
/// Backends translate their native failures into one of these kinds so that
/// callers branch on the kind instead of inspecting error codes or messages.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Object not found
    ObjectNotFound { key: String },

    /// Bucket not found
    BucketNotFound { bucket: String },

    /// Access denied by the remote store
    AccessDenied { operation: String, message: String },

    /// The remote call did not complete in time
    Timeout { operation: String },

    /// Operation not supported by this backend
    Unsupported { operation: String, reason: String },

    /// Any other failure reported by the backend
    Backend { operation: String, message: String },
}

impl StorageError {
    pub fn backend(operation: &str, message: impl std::fmt::Display) -> Self {
        StorageError::Backend {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    pub fn unsupported(operation: &str, reason: &str) -> Self {
        StorageError::Unsupported {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ObjectNotFound { key } => {
                write!(f, "The specified key does not exist: {}", key)
            }
            StorageError::BucketNotFound { bucket } => {
                write!(f, "The specified bucket does not exist: {}", bucket)
            }
            StorageError::AccessDenied { operation, message } => {
                write!(f, "Access denied for operation '{}': {}", operation, message)
            }
            StorageError::Timeout { operation } => {
                write!(f, "Operation '{}' timed out", operation)
            }
            StorageError::Unsupported { operation, reason } => {
                write!(f, "Unsupported operation '{}': {}", operation, reason)
            }
            StorageError::Backend { operation, message } => {
                write!(f, "Storage backend error during '{}': {}", operation, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
