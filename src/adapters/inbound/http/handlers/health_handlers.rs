use axum::{extract::State, Json};

use crate::adapters::inbound::http::{dto::HealthResponseDto, router::AppState};

/// Liveness probe
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponseDto> {
    Json(HealthResponseDto {
        status: "ok".to_string(),
        bucket: app_state.blob_store.bucket().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
