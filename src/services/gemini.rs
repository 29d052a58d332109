use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::GeminiConfig;
use crate::error::ExtractionError;
use crate::models::{ApiErrorBody, ExtractionRequest, ExtractionResponse, GenerateContentResponse};

/// Something that can turn an [`ExtractionRequest`] into the model's reply
/// text. One call, one round trip.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<String, ExtractionError>;
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }

    /// Send the request and decode the reply envelope without interpreting it.
    pub async fn generate(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResponse, ExtractionError> {
        let start = Instant::now();
        info!(
            model = %self.config.model,
            mime_type = %request.mime_type,
            payload_len = request.encoded_payload.len(),
            "Sending extraction request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request.to_body())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        debug!(
            status = %status,
            body_len = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extraction API responded"
        );

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown status")
                        .to_string()
                });
            warn!(status = %status, message = %message, "Extraction API returned an error");
            return Err(ExtractionError::api(message));
        }

        let reply: GenerateContentResponse = serde_json::from_slice(&body)
            .map_err(|e| ExtractionError::malformed(e.to_string()))?;

        Ok(reply.into())
    }
}

#[async_trait]
impl Extractor for GeminiClient {
    async fn extract(&self, request: &ExtractionRequest) -> Result<String, ExtractionError> {
        let text = self.generate(request).await?.into_text()?;
        info!(text_len = text.len(), "Extraction reply received");
        Ok(text)
    }
}
