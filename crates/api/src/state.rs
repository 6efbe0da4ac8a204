use std::sync::Arc;

use bridge_core::config::BridgeConfig;
use bridge_pipeline::JobPipeline;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Bridge-wide configuration (directories, template host, platform).
    pub config: Arc<BridgeConfig>,
    /// The job pipeline every accepted request is dispatched onto.
    pub pipeline: Arc<JobPipeline>,
}
