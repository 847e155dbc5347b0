//! Remote asset store client
//!
//! The store is a fetch-by-key byte service. Production code talks to the
//! storage HTTP API through [`HttpStore`]; tests use [`MockStore`], which
//! serves canned bytes and records fetch counts.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use crate::core::{Error, StoreConfig};

/// Fetch-by-key access to the remote model bucket
pub trait RemoteStore: Send + Sync + 'static {
    /// Download the full body of the file named `key`
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;
}

/// HTTP client for the storage service
///
/// Issues `GET {endpoint}/storage/buckets/{bucket}/files/{key}/download`
/// with the project identifier in a request header.
pub struct HttpStore {
    client: reqwest::Client,
    config: StoreConfig,
}

impl HttpStore {
    /// Create a client for the given store configuration
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn download_url(&self, key: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/download",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket_id,
            key
        )
    }
}

impl RemoteStore for HttpStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, Error> {
        let url = self.download_url(key);
        log::debug!("fetching {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Project", &self.config.project_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Download {
                key: key.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// In-memory store for tests
///
/// Serves bytes registered with [`MockStore::insert`] and fails every fetch
/// for keys registered with [`MockStore::fail_key`]. Fetch counts are
/// tracked per key so tests can assert on network activity.
#[derive(Default)]
pub struct MockStore {
    objects: HashMap<String, Vec<u8>>,
    failing: HashMap<String, String>,
    fetches: Mutex<HashMap<String, usize>>,
    latency: Option<std::time::Duration>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register canned bytes for a key
    pub fn insert(&mut self, key: &str, bytes: &[u8]) {
        self.objects.insert(key.to_string(), bytes.to_vec());
    }

    /// Make every fetch of `key` fail with the given reason
    pub fn fail_key(&mut self, key: &str, reason: &str) {
        self.failing.insert(key.to_string(), reason.to_string());
    }

    /// Delay every fetch, so tests can overlap in-flight downloads
    pub fn set_latency(&mut self, latency: std::time::Duration) {
        self.latency = Some(latency);
    }

    /// Number of fetches issued for a specific key
    pub fn fetch_count(&self, key: &str) -> usize {
        self.fetches.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    /// Total number of fetches issued across all keys
    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

impl RemoteStore for MockStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, Error> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_insert(0) += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(reason) = self.failing.get(key) {
            return Err(Error::Download {
                key: key.to_string(),
                reason: reason.clone(),
            });
        }

        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Download {
                key: key.to_string(),
                reason: "not found".to_string(),
            })
    }
}
