use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{errors::BlobError, models::SignedUrl};

/// DTO for a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponseDto {
    pub message: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl UploadResponseDto {
    pub fn new(message: &str, signed: SignedUrl) -> Self {
        UploadResponseDto {
            message: message.to_string(),
            url: signed.url,
            expires_at: signed.expires_at,
        }
    }
}

/// DTO for the health probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub bucket: String,
    pub version: String,
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// Error response helpers

impl ErrorResponseDto {
    pub fn from_blob_error(error: &BlobError) -> Self {
        ErrorResponseDto {
            error: error.code().to_string(),
            message: error.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        ErrorResponseDto {
            error: "BadRequest".to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn internal_error(message: &str) -> Self {
        ErrorResponseDto {
            error: "InternalServerError".to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}
