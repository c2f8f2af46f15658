//! Read cache for the content index. One explicit object with a defined
//! lifecycle: constructed at process start, revalidated against the pointer
//! file on every get, replaced on hash mismatch.
//!
//! Concurrent requests may race on the slot; last-fetch-wins is fine because
//! snapshots are immutable and content-addressed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::debug;

use crate::index::snapshot::{PointerFile, POINTER_FILE};
use crate::index::ContentIndex;

struct CachedIndex {
    hash: String,
    index: Arc<ContentIndex>,
}

pub struct IndexCache {
    static_dir: PathBuf,
    slot: RwLock<Option<CachedIndex>>,
}

impl IndexCache {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            slot: RwLock::new(None),
        }
    }

    /// Returns the current index: a short-lived pointer lookup decides
    /// whether the cached parse is still current, otherwise the hash-named
    /// snapshot is loaded and the slot replaced.
    pub async fn get(&self) -> Result<Arc<ContentIndex>> {
        let pointer = self.read_pointer().await?;

        {
            let slot = self.slot.read().await;
            if let Some(cached) = slot.as_ref() {
                if cached.hash == pointer.hash {
                    return Ok(Arc::clone(&cached.index));
                }
            }
        }

        debug!("Content index cache miss, loading {}", pointer.filename);
        let index = Arc::new(self.read_snapshot(&pointer.filename).await?);

        let mut slot = self.slot.write().await;
        *slot = Some(CachedIndex {
            hash: pointer.hash,
            index: Arc::clone(&index),
        });
        Ok(index)
    }

    async fn read_pointer(&self) -> Result<PointerFile> {
        let path = self.static_dir.join(POINTER_FILE);
        let raw = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read pointer {}", path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("malformed pointer {}", path.display()))
    }

    async fn read_snapshot(&self, filename: &str) -> Result<ContentIndex> {
        let path = self.static_dir.join(filename);
        let raw = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("malformed snapshot {}", path.display()))
    }
}

impl std::fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::snapshot::{tests::fixture_index, write_snapshot};

    #[tokio::test]
    async fn test_get_fails_without_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IndexCache::new(dir.path());
        assert!(cache.get().await.is_err());
    }

    #[tokio::test]
    async fn test_get_loads_and_reuses_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let index = fixture_index();
        write_snapshot(dir.path(), &index).unwrap();

        let cache = IndexCache::new(dir.path());
        let first = cache.get().await.unwrap();
        assert_eq!(first.resume.name, "Ada Example");

        // second get with an unchanged pointer returns the same Arc
        let second = cache.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_hash_mismatch_replaces_cached_entry() {
        let dir = tempfile::tempdir().unwrap();
        let index = fixture_index();
        write_snapshot(dir.path(), &index).unwrap();

        let cache = IndexCache::new(dir.path());
        let first = cache.get().await.unwrap();

        let mut updated = fixture_index();
        updated.resume.name = "Grace Example".to_string();
        write_snapshot(dir.path(), &updated).unwrap();

        let second = cache.get().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.resume.name, "Grace Example");
    }
}
