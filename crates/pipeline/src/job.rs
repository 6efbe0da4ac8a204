//! Job data model and error taxonomy.

use std::path::PathBuf;

use bridge_cache::FetchError;
use bridge_core::config::BridgeConfig;
use bridge_engine::EngineError;

/// One accepted render request.
///
/// Lives in process memory and local temp files only; a crash mid-job loses
/// the job (no durability guarantee).
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Caller-assigned unique token; namespaces all per-job files.
    pub request_id: String,
    /// Template cache key.
    pub template_id: String,
    /// Opaque passthrough, echoed in the callback body.
    pub user_id: Option<String>,
    /// Face image, base64 on the wire (data-URI prefix tolerated).
    pub face_base64: String,
    /// Destination for the terminal outcome.
    pub callback_url: String,
    /// Optional override for where to fetch the template on a cache miss.
    pub template_url: Option<String>,
}

/// Per-job ephemeral file locations, owned exclusively by the job and
/// removed during cleanup regardless of outcome.
#[derive(Debug, Clone)]
pub struct JobPaths {
    pub face: PathBuf,
    pub output: PathBuf,
}

impl JobPaths {
    pub fn for_job(config: &BridgeConfig, request_id: &str) -> Self {
        Self {
            face: config.face_path(request_id),
            output: config.output_path(request_id),
        }
    }
}

/// Terminal result of a job, produced exactly once and consumed exactly
/// once by the callback dispatcher.
#[derive(Debug)]
pub enum JobOutcome {
    /// Render completed; carries the full artifact bytes.
    Success(Vec<u8>),
    /// Any post-acceptance failure; carries the human-readable reason.
    Failure(String),
}

/// Everything that can go wrong between acceptance and classification.
///
/// All variants funnel into `JobOutcome::Failure` with their display
/// string as the callback reason.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to stage face input: {0}")]
    Staging(String),

    #[error("Engine failed to start: {0}")]
    Engine(#[from] EngineError),

    #[error("Render failed ({exit}): {diagnostics}")]
    Render { exit: String, diagnostics: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
