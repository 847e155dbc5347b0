//! Remote store configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Error;

/// Connection settings for the remote asset store
///
/// All three values are supplied at startup; the endpoint is the storage
/// service base URL, the project and bucket identify where model files live.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Base URL of the storage service
    pub endpoint: String,
    /// Project identifier sent with every request
    pub project_id: String,
    /// Bucket holding the model files
    pub bucket_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            bucket_id: String::new(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}
