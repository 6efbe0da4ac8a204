//! The job state machine.
//!
//! Stage order: cache check → conditional fetch → input staging → render →
//! classification → callback → cleanup. All stage errors funnel into one
//! [`JobError`] and reach the callback; cleanup runs last on every path.

use std::path::Path;
use std::sync::Arc;

use bridge_cache::TemplateCache;
use bridge_core::config::BridgeConfig;
use bridge_core::error::CoreError;
use bridge_core::payload::decode_face_payload;
use bridge_engine::{EngineSettings, RenderRun};

use crate::callback::{self, CallbackBody};
use crate::cleanup;
use crate::job::{JobError, JobOutcome, JobPaths, RenderJob};

/// Characters of engine output retained in a failure reason.
const DIAGNOSTIC_TAIL_CHARS: usize = 2000;

/// Drives every accepted job; shared across all in-flight jobs via `Arc`.
///
/// Jobs are fully independent: no ordering guarantees, no admission
/// control, no per-job cancellation once accepted.
pub struct JobPipeline {
    config: Arc<BridgeConfig>,
    engine: Arc<EngineSettings>,
    cache: Arc<TemplateCache>,
    http: reqwest::Client,
}

impl JobPipeline {
    pub fn new(
        config: Arc<BridgeConfig>,
        engine: Arc<EngineSettings>,
        cache: Arc<TemplateCache>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            config,
            engine,
            cache,
            http,
        }
    }

    /// Detach the job onto the runtime and return immediately.
    ///
    /// The HTTP acknowledgment does not wait for any part of the pipeline;
    /// all outcome reporting goes through the callback channel.
    pub fn spawn(self: &Arc<Self>, job: RenderJob) {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            pipeline.process(job).await;
        });
    }

    /// Run one job to its terminal state.
    ///
    /// Never returns an error: every failure becomes a `Failure` outcome,
    /// gets a callback attempt, and still reaches cleanup.
    pub async fn process(&self, job: RenderJob) {
        tracing::info!(
            request_id = %job.request_id,
            template_id = %job.template_id,
            "Job accepted",
        );

        let paths = JobPaths::for_job(&self.config, &job.request_id);

        let outcome = match self.execute(&job, &paths).await {
            Ok(artifact) => {
                tracing::info!(
                    request_id = %job.request_id,
                    artifact_bytes = artifact.len(),
                    "Render complete",
                );
                JobOutcome::Success(artifact)
            }
            Err(e) => {
                tracing::warn!(request_id = %job.request_id, error = %e, "Job failed");
                JobOutcome::Failure(e.to_string())
            }
        };

        let body = CallbackBody::from_outcome(&job, outcome);
        callback::deliver(&self.http, &job.callback_url, &body).await;

        // Cleanup runs even when the callback failed; the cache entry stays.
        cleanup::remove_job_files(&paths).await;
        tracing::debug!(request_id = %job.request_id, "Job cleaned up");
    }

    /// The fallible stage sequence, up to and including classification.
    async fn execute(&self, job: &RenderJob, paths: &JobPaths) -> Result<Vec<u8>, JobError> {
        // Cache check, then fetch on miss. The single-flight guard inside
        // `ensure` re-checks the entry before downloading.
        let template_path = if self.cache.has(&job.template_id).await {
            tracing::info!(template_id = %job.template_id, "Template cache hit");
            self.cache.path_for(&job.template_id)
        } else {
            let url = self
                .config
                .resolve_template_url(&job.template_id, job.template_url.as_deref());
            self.cache.ensure(&job.template_id, &url).await?
        };

        // Stage the face input.
        let face = decode_face_payload(&job.face_base64).map_err(|e| match e {
            CoreError::Validation(msg) | CoreError::Internal(msg) => JobError::Staging(msg),
        })?;
        tokio::fs::write(&paths.face, &face).await.map_err(|e| {
            JobError::Staging(format!("could not write {}: {e}", paths.face.display()))
        })?;

        // Render.
        let render =
            bridge_engine::run(&self.engine, &paths.face, &template_path, &paths.output).await?;

        classify(render, &paths.output).await
    }
}

/// Classify a finished render.
///
/// Success requires BOTH a zero exit status and the output artifact on
/// disk; the engine can exit cleanly without producing output, and that is
/// a failure. On success the artifact is read fully into memory for
/// transport.
async fn classify(render: RenderRun, output: &Path) -> Result<Vec<u8>, JobError> {
    if !render.succeeded() {
        return Err(JobError::Render {
            exit: render.exit_label(),
            diagnostics: diagnostics_from(&render),
        });
    }

    match tokio::fs::read(output).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(JobError::Render {
            exit: format!("{} but no output artifact", render.exit_label()),
            diagnostics: diagnostics_from(&render),
        }),
        Err(e) => Err(JobError::Internal(format!(
            "could not read artifact {}: {e}",
            output.display()
        ))),
    }
}

fn diagnostics_from(render: &RenderRun) -> String {
    let tail = render.log_tail(DIAGNOSTIC_TAIL_CHARS);
    if tail.is_empty() {
        "no engine output".to_string()
    } else {
        tail
    }
}
