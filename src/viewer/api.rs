//! Blocking HTTP client for the catalog API, used from fetch worker
//! threads so the event loop never blocks on the network.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::viewer::error::ViewerError;

/// Catalog record as served by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub model_name: String,
    pub category: String,
    pub description: String,
    pub file_path: String,
    /// Public URL of the stored binary; the asset is fetched from here.
    pub file_url: String,
    #[serde(default)]
    pub applications: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct CatalogClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self, ViewerError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ViewerError::Metadata(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The full catalog, newest first (the server orders it).
    pub fn list_models(&self) -> Result<Vec<CatalogEntry>, ViewerError> {
        self.http
            .get(format!("{}/api/products", self.base_url))
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| ViewerError::Metadata(e.to_string()))
    }

    pub fn get_model(&self, id: &str) -> Result<CatalogEntry, ViewerError> {
        let response = self
            .http
            .get(format!("{}/api/products/{}", self.base_url, id))
            .send()
            .map_err(|e| ViewerError::Metadata(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ViewerError::Metadata(format!(
                "product not found (ID: {})",
                id
            )));
        }

        response
            .error_for_status()
            .and_then(|r| r.json())
            .map_err(|e| ViewerError::Metadata(e.to_string()))
    }

    /// Raw asset bytes from the object store's public URL.
    pub fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, ViewerError> {
        let response = self
            .http
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ViewerError::AssetLoad(e.to_string()))?;

        let bytes = response
            .bytes()
            .map_err(|e| ViewerError::AssetLoad(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
