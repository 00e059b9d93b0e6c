use aws_sdk_s3::error::{DisplayErrorContext, SdkError};

use crate::domain::errors::StorageError;

/// Map an object_store failure onto a storage error for `operation`
pub fn from_object_store(operation: &str, err: object_store::Error) -> StorageError {
    match err {
        object_store::Error::NotFound { path, .. } => StorageError::ObjectNotFound { key: path },
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => StorageError::AccessDenied {
            operation: operation.to_string(),
            message: err.to_string(),
        },
        object_store::Error::NotSupported { .. } | object_store::Error::NotImplemented => {
            StorageError::Unsupported {
                operation: operation.to_string(),
                reason: err.to_string(),
            }
        }
        _ => StorageError::backend(operation, err),
    }
}

impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        from_object_store("object_store", err)
    }
}

/// Map an AWS SDK failure that is not a not-found condition
///
/// Callers match the operation-specific not-found variants first.
pub fn from_sdk_error<E>(operation: &str, err: SdkError<E>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    if let SdkError::TimeoutError(_) = err {
        return StorageError::Timeout {
            operation: operation.to_string(),
        };
    }

    let status = match &err {
        SdkError::ServiceError(service_err) => Some(service_err.raw().status().as_u16()),
        _ => None,
    };
    let message = DisplayErrorContext(&err).to_string();

    match status {
        Some(403) => StorageError::AccessDenied {
            operation: operation.to_string(),
            message,
        },
        _ => StorageError::Backend {
            operation: operation.to_string(),
            message,
        },
    }
}
