use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health, upload_image};
use crate::ports::services::BlobStore;

pub const DEFAULT_UPLOAD_ROUTE: &str = "/api/upload";
pub const DEFAULT_UPLOAD_FIELD: &str = "image";
pub const DEFAULT_KEY_PREFIX: &str = "images/";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Settings of the upload route
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSettings {
    /// Path the route is mounted on
    pub route: String,
    /// Multipart field carrying the file
    pub field_name: String,
    /// Prepended to the uploaded file name to form the object key
    pub key_prefix: String,
    pub max_upload_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            route: DEFAULT_UPLOAD_ROUTE.to_string(),
            field_name: DEFAULT_UPLOAD_FIELD.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub blob_store: Arc<dyn BlobStore>,
    pub upload: Arc<UploadSettings>,
}

/// Create the application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let upload_route = state.upload.route.clone();
    let body_limit = state.upload.max_upload_bytes;

    Router::new()
        .route("/", get(health))
        .route(&upload_route, post(upload_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// CORS policy: any origin, the methods browsers use against the API
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}
