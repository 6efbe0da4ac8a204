//! Keyed on-disk template store with single-flight download guard.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::fetch::{fetch, FetchError};

/// On-disk cache of template assets, keyed by template id.
///
/// No eviction, no size bound, no TTL: entries accumulate for the lifetime
/// of the host volume. An entry is either absent or a complete file — the
/// fetcher removes partial writes on failure.
///
/// Concurrent misses for the same key are collapsed into a single download:
/// each key has an in-flight lock, and waiters re-check the disk after
/// acquiring it. One lock entry persists per key ever requested, matching
/// the cache's accumulate-forever policy.
pub struct TemplateCache {
    dir: PathBuf,
    client: reqwest::Client,
    fetch_timeout: Duration,
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TemplateCache {
    /// Create a cache rooted at `dir` (must already exist).
    pub fn new(dir: PathBuf, client: reqwest::Client, fetch_timeout: Duration) -> Self {
        Self {
            dir,
            client,
            fetch_timeout,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Canonical path for a template id.
    pub fn path_for(&self, template_id: &str) -> PathBuf {
        self.dir.join(format!("{template_id}.mp4"))
    }

    /// Whether a complete entry exists for `template_id`.
    pub async fn has(&self, template_id: &str) -> bool {
        file_exists(&self.path_for(template_id)).await
    }

    /// Return the entry path for `template_id`, downloading from
    /// `source_url` first if the entry is absent.
    ///
    /// Never re-fetches an existing entry, even if `source_url` differs
    /// from the URL that originally populated it.
    pub async fn ensure(&self, template_id: &str, source_url: &str) -> Result<PathBuf, FetchError> {
        let path = self.path_for(template_id);

        if file_exists(&path).await {
            return Ok(path);
        }

        let key_lock = {
            let mut map = self.inflight.lock().await;
            Arc::clone(map.entry(template_id.to_string()).or_default())
        };
        let _fetch_permit = key_lock.lock().await;

        // Another job may have completed the download while we waited.
        if file_exists(&path).await {
            tracing::debug!(template_id, "Cache hit after awaiting in-flight fetch");
            return Ok(path);
        }

        tracing::info!(template_id, url = source_url, "Template cache miss, downloading");
        fetch(&self.client, source_url, &path, self.fetch_timeout).await?;
        tracing::info!(template_id, path = %path.display(), "Template downloaded and cached");

        Ok(path)
    }
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
