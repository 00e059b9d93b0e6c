pub mod health_handlers;
pub mod upload_handlers;

pub use health_handlers::*;
pub use upload_handlers::*;

use axum::{http::StatusCode, Json};
use tracing::error;

use crate::{adapters::inbound::http::dto::ErrorResponseDto, domain::errors::BlobError};

/// Rejection returned by every handler
pub type ApiError = (StatusCode, Json<ErrorResponseDto>);

/// Only caller mistakes are 4xx; every store failure is a 500
pub fn status_for(error: &BlobError) -> StatusCode {
    match error {
        BlobError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn blob_error_response(error: BlobError) -> ApiError {
    let status = status_for(&error);
    if status.is_server_error() {
        error!("Request failed: {}", error);
    }
    (status, Json(ErrorResponseDto::from_blob_error(&error)))
}
