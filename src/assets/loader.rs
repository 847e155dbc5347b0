//! Async asset resolution with non-blocking result polling
//!
//! The interactive loop never blocks on the network: it requests a
//! resolution here, keeps ticking, and drains completed results each frame
//! with [`AssetLoader::poll_results`].

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::assets::cache::AssetCache;
use crate::assets::store::RemoteStore;

/// Outcome of one asset resolution
#[derive(Debug, Clone)]
pub enum ResolveResult {
    /// The identifier resolved to a ready-to-read local file
    Resolved { id: String, path: PathBuf },
    /// Resolution failed; the error is already reduced to a display string
    Failed { id: String, error: String },
}

impl ResolveResult {
    /// Identifier this result belongs to
    pub fn id(&self) -> &str {
        match self {
            ResolveResult::Resolved { id, .. } => id,
            ResolveResult::Failed { id, .. } => id,
        }
    }
}

/// Off-thread driver for [`AssetCache::resolve`]
///
/// Requests are deduplicated per identifier: a second `request` for an
/// identifier that is still pending is a no-op. Results arrive over a
/// channel and are polled non-blocking from the interactive loop.
pub struct AssetLoader<S: RemoteStore> {
    cache: Arc<AssetCache<S>>,
    result_tx: mpsc::UnboundedSender<ResolveResult>,
    result_rx: mpsc::UnboundedReceiver<ResolveResult>,
    /// Identifiers currently being resolved
    pending: HashSet<String>,
    /// Dedicated runtime (None when riding the caller's runtime)
    runtime: Option<Runtime>,
}

impl<S: RemoteStore> AssetLoader<S> {
    /// Create a loader with its own tokio runtime
    ///
    /// Use this from a plain interactive thread with no runtime of its own.
    pub fn new(cache: Arc<AssetCache<S>>) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let runtime = Runtime::new().expect("Failed to create tokio runtime");

        Self {
            cache,
            result_tx,
            result_rx,
            pending: HashSet::new(),
            runtime: Some(runtime),
        }
    }

    /// Create a loader that spawns onto the current tokio runtime
    ///
    /// Panics if called outside a tokio runtime context.
    pub fn new_with_current_runtime(cache: Arc<AssetCache<S>>) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        Self {
            cache,
            result_tx,
            result_rx,
            pending: HashSet::new(),
            runtime: None,
        }
    }

    /// Request an identifier to be resolved in the background
    ///
    /// Returns `false` if the identifier is already pending, `true` if a
    /// resolution task was spawned.
    pub fn request(&mut self, id: &str) -> bool {
        if self.pending.contains(id) {
            return false;
        }

        self.pending.insert(id.to_string());

        let cache = self.cache.clone();
        let result_tx = self.result_tx.clone();
        let id = id.to_string();

        let task = async move {
            let result = match cache.resolve(&id).await {
                Ok(path) => ResolveResult::Resolved { id, path },
                Err(e) => ResolveResult::Failed {
                    id,
                    error: e.to_string(),
                },
            };
            // Receiver dropped means the loader is gone; nothing to do
            let _ = result_tx.send(result);
        };

        match &self.runtime {
            Some(runtime) => {
                runtime.spawn(task);
            }
            None => {
                tokio::spawn(task);
            }
        }

        true
    }

    /// Poll for completed resolutions (non-blocking)
    ///
    /// Returns all currently available results and clears their pending
    /// markers.
    pub fn poll_results(&mut self) -> Vec<ResolveResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.result_rx.try_recv() {
            self.pending.remove(result.id());
            results.push(result);
        }

        results
    }

    /// Check if a specific identifier is currently pending
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    /// Number of resolutions in flight
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::store::MockStore;
    use std::time::Duration;

    fn loader_with(store: MockStore) -> (tempfile::TempDir, AssetLoader<MockStore>) {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(AssetCache::new(dir.path().join("models"), Arc::new(store)));
        let loader = AssetLoader::new_with_current_runtime(cache);
        (dir, loader)
    }

    async fn drain(loader: &mut AssetLoader<MockStore>) -> Vec<ResolveResult> {
        for _ in 0..100 {
            let results = loader.poll_results();
            if !results.is_empty() {
                return results;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        Vec::new()
    }

    #[tokio::test]
    async fn test_request_dedup_while_pending() {
        let mut store = MockStore::new();
        store.insert("apple.glb", b"apple-bytes");
        store.set_latency(Duration::from_millis(50));
        let (_dir, mut loader) = loader_with(store);

        assert!(loader.request("A"));
        assert!(!loader.request("A"));
        assert_eq!(loader.pending_count(), 1);
        assert!(loader.is_pending("A"));
    }

    #[tokio::test]
    async fn test_resolution_arrives_via_poll() {
        let mut store = MockStore::new();
        store.insert("apple.glb", b"apple-bytes");
        let (_dir, mut loader) = loader_with(store);

        loader.request("A");
        let results = drain(&mut loader).await;

        assert_eq!(results.len(), 1);
        match &results[0] {
            ResolveResult::Resolved { id, path } => {
                assert_eq!(id, "A");
                assert_eq!(path.file_name().unwrap(), "apple.glb");
            }
            other => panic!("expected Resolved, got {:?}", other),
        }
        assert!(!loader.is_pending("A"));
    }

    #[tokio::test]
    async fn test_failure_arrives_as_failed_result() {
        let mut store = MockStore::new();
        store.fail_key("apple.glb", "network down");
        let (_dir, mut loader) = loader_with(store);

        loader.request("A");
        let results = drain(&mut loader).await;

        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], ResolveResult::Failed { id, .. } if id == "A"));
    }

    #[tokio::test]
    async fn test_unknown_identifier_fails_without_fetch() {
        let (_dir, mut loader) = loader_with(MockStore::new());

        loader.request("1");
        let results = drain(&mut loader).await;

        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], ResolveResult::Failed { .. }));
    }
}
