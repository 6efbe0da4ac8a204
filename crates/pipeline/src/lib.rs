//! The asynchronous render job pipeline.
//!
//! One [`run::JobPipeline`] instance drives every accepted job through the
//! same terminal sequence: cache check → conditional fetch → input staging
//! → subprocess render → classification → callback → cleanup. Every branch,
//! including internal faults, reaches the callback and cleanup stages.

pub mod callback;
pub mod cleanup;
pub mod job;
pub mod run;

pub use job::{JobError, JobOutcome, JobPaths, RenderJob};
pub use run::JobPipeline;
