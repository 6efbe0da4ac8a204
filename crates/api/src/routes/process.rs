//! The render request intake route.
//!
//! Validation happens before acknowledgment and is the only failure the
//! HTTP caller ever sees; once a job is accepted, all outcome reporting
//! goes through the callback channel.

use axum::extract::State;
use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use bridge_core::error::CoreError;
use bridge_core::ids::{validate_callback_url, validate_request_id, validate_template_id};
use bridge_pipeline::RenderJob;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Inbound render request body.
///
/// All fields are optional at the serde level so that a missing field
/// produces a targeted validation error instead of a generic 422.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub face_base64: Option<String>,
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub template_url: Option<String>,
}

/// Immediate acknowledgment body; the render result arrives via callback.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessAccepted {
    pub status: &'static str,
    pub request_id: String,
}

/// POST /process -- validate, detach the job, acknowledge immediately.
async fn process(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> AppResult<Json<ProcessAccepted>> {
    let request_id = require_field(req.request_id, "requestId")?;
    let template_id = require_field(req.template_id, "templateId")?;
    let face_base64 = require_field(req.face_base64, "faceBase64")?;
    let callback_url = require_field(req.callback_url, "callbackUrl")?;

    // Both ids end up in filesystem paths; reject unsafe values up front.
    validate_request_id(&request_id)?;
    validate_template_id(&template_id)?;
    validate_callback_url(&callback_url)?;

    let job = RenderJob {
        request_id: request_id.clone(),
        template_id,
        user_id: req.user_id,
        face_base64,
        callback_url,
        template_url: req.template_url,
    };
    state.pipeline.spawn(job);

    Ok(Json(ProcessAccepted {
        status: "processing",
        request_id,
    }))
}

fn require_field(value: Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("Missing required field: {name}")).into()),
    }
}

/// Mount the process route.
pub fn router() -> Router<AppState> {
    Router::new().route("/process", post(process))
}
