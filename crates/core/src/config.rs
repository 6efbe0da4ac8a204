//! Bridge-wide configuration and filesystem layout.
//!
//! All per-job and cache paths are derived from one [`BridgeConfig`] built
//! at startup and passed by `Arc` into each component — no ambient globals.

use std::path::{Path, PathBuf};

/// Process-wide bridge configuration loaded from environment variables.
///
/// All fields have defaults suitable for a RunPod-style GPU worker.
/// Override via environment variables in production.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Root work directory holding the template cache and per-job files
    /// (default: `/workspace/bridge_data`).
    pub work_dir: PathBuf,
    /// Fallback host used to resolve template downloads when a request
    /// carries no `templateUrl` (default: `http://localhost:3001`).
    pub default_template_host: String,
    /// Timeout for a single template download, in seconds (default: `60`).
    pub fetch_timeout_secs: u64,
    /// Free-form platform label reported by the health endpoint
    /// (default: `runpod`).
    pub platform_label: String,
}

impl BridgeConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                   |
    /// |-------------------------|---------------------------|
    /// | `WORK_DIR`              | `/workspace/bridge_data`  |
    /// | `DEFAULT_TEMPLATE_HOST` | `http://localhost:3001`   |
    /// | `FETCH_TIMEOUT_SECS`    | `60`                      |
    /// | `PLATFORM_LABEL`        | `runpod`                  |
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR")
            .unwrap_or_else(|_| "/workspace/bridge_data".into())
            .into();

        let default_template_host = std::env::var("DEFAULT_TEMPLATE_HOST")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .trim_end_matches('/')
            .to_string();

        let fetch_timeout_secs: u64 = std::env::var("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("FETCH_TIMEOUT_SECS must be a valid u64");

        let platform_label = std::env::var("PLATFORM_LABEL").unwrap_or_else(|_| "runpod".into());

        Self {
            work_dir,
            default_template_host,
            fetch_timeout_secs,
            platform_label,
        }
    }

    /// Directory holding cached template assets.
    pub fn templates_dir(&self) -> PathBuf {
        self.work_dir.join("templates")
    }

    /// Directory holding per-job staged face inputs.
    pub fn inputs_dir(&self) -> PathBuf {
        self.work_dir.join("inputs")
    }

    /// Directory holding per-job rendered outputs.
    pub fn outputs_dir(&self) -> PathBuf {
        self.work_dir.join("outputs")
    }

    /// Create the template/input/output directories if absent.
    ///
    /// Called once at startup, before any job is accepted.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [self.templates_dir(), self.inputs_dir(), self.outputs_dir()] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Canonical cache path for a template id.
    pub fn template_path(&self, template_id: &str) -> PathBuf {
        self.templates_dir().join(format!("{template_id}.mp4"))
    }

    /// Per-job staged face input path, namespaced by request id.
    pub fn face_path(&self, request_id: &str) -> PathBuf {
        self.inputs_dir().join(format!("{request_id}_face.jpg"))
    }

    /// Per-job rendered output path, namespaced by request id.
    pub fn output_path(&self, request_id: &str) -> PathBuf {
        self.outputs_dir().join(format!("{request_id}_result.mp4"))
    }

    /// Resolve the download URL for a template: the caller-supplied
    /// override when present, otherwise the fallback host templated by id.
    pub fn resolve_template_url(&self, template_id: &str, override_url: Option<&str>) -> String {
        match override_url {
            Some(url) => url.to_string(),
            None => format!(
                "{}/templates/{template_id}.mp4",
                self.default_template_host
            ),
        }
    }

    /// Constructor rooted at an arbitrary directory, for tests.
    ///
    /// Production code always goes through [`BridgeConfig::from_env`].
    pub fn rooted_at(work_dir: &Path) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            default_template_host: "http://localhost:3001".into(),
            fetch_timeout_secs: 60,
            platform_label: "test".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_path_is_keyed_by_id() {
        let config = BridgeConfig::rooted_at(Path::new("/work"));
        assert_eq!(
            config.template_path("t1"),
            PathBuf::from("/work/templates/t1.mp4")
        );
    }

    #[test]
    fn per_job_paths_are_namespaced_by_request_id() {
        let config = BridgeConfig::rooted_at(Path::new("/work"));
        assert_eq!(
            config.face_path("r1"),
            PathBuf::from("/work/inputs/r1_face.jpg")
        );
        assert_eq!(
            config.output_path("r1"),
            PathBuf::from("/work/outputs/r1_result.mp4")
        );
    }

    #[test]
    fn resolve_url_prefers_override() {
        let config = BridgeConfig::rooted_at(Path::new("/work"));
        assert_eq!(
            config.resolve_template_url("t1", Some("https://cdn.example.com/t1.mp4")),
            "https://cdn.example.com/t1.mp4"
        );
    }

    #[test]
    fn resolve_url_falls_back_to_default_host() {
        let config = BridgeConfig::rooted_at(Path::new("/work"));
        assert_eq!(
            config.resolve_template_url("t1", None),
            "http://localhost:3001/templates/t1.mp4"
        );
    }

    #[test]
    fn ensure_dirs_creates_all_three() {
        let tmp = tempfile::tempdir().unwrap();
        let config = BridgeConfig::rooted_at(tmp.path());
        config.ensure_dirs().unwrap();

        assert!(config.templates_dir().is_dir());
        assert!(config.inputs_dir().is_dir());
        assert!(config.outputs_dir().is_dir());
    }
}
