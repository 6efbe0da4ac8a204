use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Platform label from configuration.
    pub platform: String,
    /// Template cache directory.
    pub cache_dir: String,
    /// Rendered output directory.
    pub output_dir: String,
}

/// GET /health -- reports service status and the active directory layout.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online",
        platform: state.config.platform_label.clone(),
        cache_dir: state.config.templates_dir().display().to_string(),
        output_dir: state.config.outputs_dir().display().to_string(),
    })
}

/// Mount the health check route.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
