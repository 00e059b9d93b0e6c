use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::ObjectKey;

/// Handle returned by a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct BlobHandle {
    pub key: ObjectKey,
    pub size: u64,
    pub etag: Option<String>,
    pub version_id: Option<String>,
}

/// A time-limited URL granting read access to one object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl SignedUrl {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl std::fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
