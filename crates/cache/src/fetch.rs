//! Streamed HTTP download with delete-partial-on-failure semantics.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

/// Error type for template downloads.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Download `url` into `dest`, streaming the body to disk.
///
/// The whole transfer (connect, headers, body) is bounded by `timeout`.
/// On any failure — network error, timeout, non-2xx status, write error —
/// whatever was partially written at `dest` is removed before the error is
/// surfaced, so a file at `dest` always means a complete transfer.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    timeout: Duration,
) -> Result<(), FetchError> {
    match stream_to_file(client, url, dest, timeout).await {
        Ok(()) => Ok(()),
        Err(e) => {
            remove_partial(dest).await;
            Err(e)
        }
    }
}

async fn stream_to_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    timeout: Duration,
) -> Result<(), FetchError> {
    let response = client.get(url).timeout(timeout).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(())
}

/// Best-effort removal of a partially written file.
async fn remove_partial(dest: &Path) {
    match tokio::fs::remove_file(dest).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %dest.display(), error = %e, "Failed to remove partial download");
        }
    }
}
