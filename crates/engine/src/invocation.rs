//! The fixed FaceFusion invocation contract.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Processors applied to every render, in order.
const PROCESSORS: &[&str] = &["face_swapper", "face_enhancer"];

/// Engine invocation settings.
///
/// Everything here is constant across jobs; only the three paths passed to
/// [`build_args`](Self::build_args) vary per job.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Engine install root; the child's working directory.
    pub root: PathBuf,
    /// Python interpreter used to launch the engine (default: `python3`).
    pub python_bin: String,
    /// Entry script, resolved relative to `root` (default: `facefusion.py`).
    pub script: String,
    /// Execution provider flag value (default: `cuda`).
    pub execution_provider: String,
    /// Output video preset (default: `ultrafast`).
    pub output_video_preset: String,
    /// Output video quality, 0-100 (default: `80`).
    pub output_video_quality: String,
}

impl EngineSettings {
    /// Load engine settings from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `ENGINE_ROOT`          | `/workspace/facefusion` |
    /// | `ENGINE_PYTHON`        | `python3`               |
    /// | `EXECUTION_PROVIDER`   | `cuda`                  |
    /// | `OUTPUT_VIDEO_PRESET`  | `ultrafast`             |
    /// | `OUTPUT_VIDEO_QUALITY` | `80`                    |
    pub fn from_env() -> Self {
        Self {
            root: std::env::var("ENGINE_ROOT")
                .unwrap_or_else(|_| "/workspace/facefusion".into())
                .into(),
            python_bin: std::env::var("ENGINE_PYTHON").unwrap_or_else(|_| "python3".into()),
            script: "facefusion.py".into(),
            execution_provider: std::env::var("EXECUTION_PROVIDER")
                .unwrap_or_else(|_| "cuda".into()),
            output_video_preset: std::env::var("OUTPUT_VIDEO_PRESET")
                .unwrap_or_else(|_| "ultrafast".into()),
            output_video_quality: std::env::var("OUTPUT_VIDEO_QUALITY")
                .unwrap_or_else(|_| "80".into()),
        }
    }

    /// Build the full argument list for one render.
    pub fn build_args(&self, input: &Path, template: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.script.clone().into(),
            "headless-run".into(),
            "--source-paths".into(),
            input.as_os_str().to_os_string(),
            "--target-path".into(),
            template.as_os_str().to_os_string(),
            "--output-path".into(),
            output.as_os_str().to_os_string(),
            "--processors".into(),
        ];
        args.extend(PROCESSORS.iter().map(OsString::from));
        args.push("--execution-providers".into());
        args.push(self.execution_provider.as_str().into());
        args.push("--output-video-preset".into());
        args.push(self.output_video_preset.as_str().into());
        args.push("--output-video-quality".into());
        args.push(self.output_video_quality.as_str().into());
        args.push("--keep-fps".into());
        args
    }

    /// Assemble the ready-to-spawn command for one render.
    pub fn command(
        &self,
        input: &Path,
        template: &Path,
        output: &Path,
    ) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.python_bin);
        cmd.current_dir(&self.root);
        cmd.args(self.build_args(input, template, output));
        cmd
    }
}
