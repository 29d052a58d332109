use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use tracing::info;

use crate::models::{ErrorResponse, SaveDocumentResponse, StoredDocument};

/// HTTP client for the backend's `POST /api/data`.
#[derive(Debug, Clone)]
pub struct DocumentApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl DocumentApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Store a finalized result. Not retried; callers resubmit on failure.
    pub async fn save(&self, document_type: &str, data: &Value) -> Result<StoredDocument> {
        let url = format!("{}/api/data", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "document_type": document_type, "data": data }))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(anyhow!("Saving document failed ({}): {}", status, message));
        }

        let saved: SaveDocumentResponse = response
            .json()
            .await
            .context("Failed to decode save response")?;

        info!(id = %saved.document.id, document_type = %saved.document.document_type, "{}", saved.message);
        Ok(saved.document)
    }
}
