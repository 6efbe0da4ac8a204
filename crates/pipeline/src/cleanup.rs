//! Best-effort removal of per-job ephemeral files.

use std::path::Path;

use crate::job::JobPaths;

/// Remove the job's staged input and rendered output if they exist.
///
/// Runs on every exit path, after the callback attempt. A missing file is
/// not an error; a real deletion failure is logged and swallowed. The
/// template cache entry used by the job is never touched.
pub async fn remove_job_files(paths: &JobPaths) {
    remove_if_present(&paths.face).await;
    remove_if_present(&paths.output).await;
}

async fn remove_if_present(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed job file");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove job file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn removes_existing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let face = tmp.path().join("r1_face.jpg");
        let output = tmp.path().join("r1_result.mp4");
        tokio::fs::write(&face, b"f").await.unwrap();
        tokio::fs::write(&output, b"o").await.unwrap();

        remove_job_files(&JobPaths {
            face: face.clone(),
            output: output.clone(),
        })
        .await;

        assert!(!face.exists());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn missing_files_are_not_an_error() {
        let paths = JobPaths {
            face: PathBuf::from("/nonexistent/r1_face.jpg"),
            output: PathBuf::from("/nonexistent/r1_result.mp4"),
        };
        // Must complete without panicking.
        remove_job_files(&paths).await;
    }
}
