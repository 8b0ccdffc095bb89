//! Ollama model listing client

use super::{ApiError, ModelCatalog, ModelEntry};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Model catalog backed by an Ollama server's tags endpoint
pub struct OllamaCatalog {
    client: Client,
    base_url: String,
}

impl OllamaCatalog {
    /// Create a new catalog for the given Ollama server
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url,
        }
    }
}

/// Ollama tags response
#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[async_trait]
impl ModelCatalog for OllamaCatalog {
    async fn list_models(&self) -> Result<Vec<ModelEntry>, ApiError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models)
    }
}
