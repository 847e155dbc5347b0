//! Age-swept file cache for downloaded model assets
//!
//! Resolving an identifier maps it through the catalog, sweeps entries older
//! than the retention window out of the cache directory, and serves the
//! named file if it survived the sweep. On a miss the file is downloaded
//! from the remote store, written to a `.part` temp file, and renamed into
//! place so a half-written download is never visible under the final name.
//!
//! Concurrent resolves for the same key coalesce onto a single download:
//! the cache keeps one async lock per key, and waiters re-check the
//! filesystem once the lock is theirs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use crate::assets::catalog;
use crate::assets::store::RemoteStore;
use crate::core::Error;

/// Retention window: entries older than this are purged before lookup
pub const MAX_CACHE_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// File cache over a remote store
///
/// The cache directory is flat: one file per asset key, mtime is the only
/// metadata consulted. A present file younger than [`MAX_CACHE_AGE`] is
/// trusted without re-validation.
pub struct AssetCache<S: RemoteStore> {
    store: Arc<S>,
    cache_dir: PathBuf,
    /// One lock per asset key, so at most one download per key is in flight
    key_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: RemoteStore> AssetCache<S> {
    /// Create a cache backed by `store`, writing into `cache_dir`
    ///
    /// The directory is created lazily on first resolve.
    pub fn new(cache_dir: PathBuf, store: Arc<S>) -> Self {
        Self {
            store,
            cache_dir,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve an identifier to a local, ready-to-read file
    ///
    /// # Errors
    /// * `Error::UnknownAsset` — identifier not in the catalog; no
    ///   filesystem or network activity has happened.
    /// * `Error::Download` / `Error::Io` — the fetch or the write failed;
    ///   no file is left under the final name.
    pub async fn resolve(&self, id: &str) -> Result<PathBuf, Error> {
        let key = catalog::asset_key(id)?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        self.sweep_stale().await?;

        let path = self.cache_dir.join(key);
        if path.exists() {
            log::debug!("cache hit for {} ({})", id, key);
            return Ok(path);
        }

        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        // Another resolve may have completed the download while we waited
        if path.exists() {
            log::debug!("cache hit for {} after waiting on in-flight download", id);
            return Ok(path);
        }

        log::info!("cache miss for {}, downloading {}", id, key);
        let bytes = self.store.fetch(key).await?;

        // Write to a temp name and rename so a crash mid-write cannot leave
        // a corrupt file that a later existence check would trust
        let tmp = self.cache_dir.join(format!("{}.part", key));
        if let Err(e) = self.commit(&tmp, &path, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }

        Ok(path)
    }

    /// Directory the cache writes into
    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    async fn commit(&self, tmp: &PathBuf, path: &PathBuf, bytes: &[u8]) -> Result<(), Error> {
        tokio::fs::write(tmp, bytes).await?;
        tokio::fs::rename(tmp, path).await?;
        Ok(())
    }

    /// Delete every cache entry older than the retention window
    async fn sweep_stale(&self) -> Result<(), Error> {
        let threshold = SystemTime::now() - MAX_CACHE_AGE;

        let mut entries = tokio::fs::read_dir(&self.cache_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    log::warn!("skipping unreadable cache entry {:?}: {}", entry.path(), e);
                    continue;
                }
            };

            if modified < threshold {
                log::debug!("sweeping stale cache entry {:?}", entry.path());
                if let Err(e) = tokio::fs::remove_file(entry.path()).await {
                    log::warn!("failed to sweep {:?}: {}", entry.path(), e);
                }
            }
        }

        Ok(())
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.key_locks
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::store::MockStore;

    fn backdate(path: &std::path::Path, age: Duration) {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(path)
            .unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    fn cache_with(store: MockStore) -> (tempfile::TempDir, AssetCache<MockStore>) {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path().join("models"), Arc::new(store));
        (dir, cache)
    }

    #[tokio::test]
    async fn test_resolve_downloads_once_then_hits() {
        let mut store = MockStore::new();
        store.insert("apple.glb", b"apple-bytes");
        let (_dir, cache) = cache_with(store);

        let path = cache.resolve("A").await.unwrap();
        assert_eq!(path.file_name().unwrap(), "apple.glb");
        assert_eq!(std::fs::read(&path).unwrap(), b"apple-bytes");

        let again = cache.resolve("A").await.unwrap();
        assert_eq!(again, path);
        assert_eq!(cache.store.fetch_count("apple.glb"), 1);
    }

    #[tokio::test]
    async fn test_unknown_identifier_no_activity() {
        let (_dir, cache) = cache_with(MockStore::new());

        let err = cache.resolve("1").await.unwrap_err();
        assert!(matches!(err, Error::UnknownAsset(id) if id == "1"));

        // Lookup failed before any filesystem work: not even the cache
        // directory was created
        assert!(!cache.cache_dir().exists());
        assert_eq!(cache.store.total_fetches(), 0);
    }

    #[tokio::test]
    async fn test_stale_target_swept_and_refetched() {
        let mut store = MockStore::new();
        store.insert("apple.glb", b"fresh-bytes");
        let (_dir, cache) = cache_with(store);

        let path = cache.resolve("A").await.unwrap();
        assert_eq!(cache.store.fetch_count("apple.glb"), 1);

        backdate(&path, MAX_CACHE_AGE + Duration::from_secs(3600));

        let path = cache.resolve("A").await.unwrap();
        assert_eq!(cache.store.fetch_count("apple.glb"), 2);
        assert_eq!(std::fs::read(&path).unwrap(), b"fresh-bytes");
    }

    #[tokio::test]
    async fn test_sweep_removes_unrelated_stale_entries() {
        let mut store = MockStore::new();
        store.insert("apple.glb", b"apple-bytes");
        let (_dir, cache) = cache_with(store);

        std::fs::create_dir_all(cache.cache_dir()).unwrap();
        let zebra = cache.cache_dir().join("zebra.glb");
        std::fs::write(&zebra, b"old-zebra").unwrap();
        backdate(&zebra, MAX_CACHE_AGE + Duration::from_secs(60));

        cache.resolve("A").await.unwrap();

        assert!(!zebra.exists());
        assert_eq!(cache.store.fetch_count("zebra.glb"), 0);
    }

    #[tokio::test]
    async fn test_fresh_entry_survives_sweep() {
        let mut store = MockStore::new();
        store.insert("apple.glb", b"apple-bytes");
        let (_dir, cache) = cache_with(store);

        std::fs::create_dir_all(cache.cache_dir()).unwrap();
        let zebra = cache.cache_dir().join("zebra.glb");
        std::fs::write(&zebra, b"recent-zebra").unwrap();

        cache.resolve("A").await.unwrap();
        assert!(zebra.exists());
    }

    #[tokio::test]
    async fn test_failed_download_leaves_no_file() {
        let mut store = MockStore::new();
        store.fail_key("apple.glb", "network down");
        let (_dir, cache) = cache_with(store);

        let err = cache.resolve("A").await.unwrap_err();
        assert!(matches!(err, Error::Download { .. }));

        assert!(!cache.cache_dir().join("apple.glb").exists());
        assert!(!cache.cache_dir().join("apple.glb.part").exists());
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_one_download() {
        let mut store = MockStore::new();
        store.insert("apple.glb", b"apple-bytes");
        store.set_latency(Duration::from_millis(50));

        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(AssetCache::new(
            dir.path().join("models"),
            Arc::new(store),
        ));

        let a = tokio::spawn({
            let cache = cache.clone();
            async move { cache.resolve("A").await }
        });
        let b = tokio::spawn({
            let cache = cache.clone();
            async move { cache.resolve("A").await }
        });

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert_eq!(a, b);
        assert_eq!(cache.store.fetch_count("apple.glb"), 1);
    }
}
