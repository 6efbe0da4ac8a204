//! Fire-and-forget outcome delivery to the caller's endpoint.

use serde::Serialize;

use bridge_core::payload::encode_artifact;

use crate::job::{JobOutcome, RenderJob};

/// JSON body POSTed to the callback URL.
///
/// The success variant carries the full artifact bytes inline as base64
/// rather than a reference; large artifacts inflating the request body is
/// an accepted tradeoff.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackBody {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallbackBody {
    /// Consume the job's outcome into its wire representation.
    pub fn from_outcome(job: &RenderJob, outcome: JobOutcome) -> Self {
        match outcome {
            JobOutcome::Success(artifact) => Self {
                request_id: job.request_id.clone(),
                user_id: job.user_id.clone(),
                success: true,
                video_base64: Some(encode_artifact(&artifact)),
                error: None,
            },
            JobOutcome::Failure(reason) => Self {
                request_id: job.request_id.clone(),
                user_id: job.user_id.clone(),
                success: false,
                video_base64: None,
                error: Some(reason),
            },
        }
    }
}

/// Deliver the outcome, best-effort.
///
/// No retry, no backoff, no dead-letter queue: a delivery failure is logged
/// and discarded, and the job proceeds to cleanup regardless.
pub async fn deliver(client: &reqwest::Client, callback_url: &str, body: &CallbackBody) {
    match client.post(callback_url).json(body).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::info!(
                request_id = %body.request_id,
                success = body.success,
                "Callback delivered",
            );
        }
        Ok(response) => {
            tracing::error!(
                request_id = %body.request_id,
                status = %response.status(),
                "Callback endpoint rejected delivery",
            );
        }
        Err(e) => {
            tracing::error!(
                request_id = %body.request_id,
                error = %e,
                "Callback delivery failed",
            );
        }
    }
}
