use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{AnalyticsProvider, KeyPhraseResponse, ProviderResponse, SentimentResponse};
use crate::batch::ChunkRequest;
use crate::config::Config;
use crate::error::ProviderError;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Client for a Text Analytics v2 style REST API (`/sentiment`, `/keyPhrases`).
#[derive(Debug, Clone)]
pub struct TextAnalyticsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_documents_per_request: usize,
}

impl TextAnalyticsClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("spiel-insights/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            max_documents_per_request: 1000,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ProviderError> {
        let api_key = cfg.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        Ok(Self::new(&cfg.endpoint, api_key, Duration::from_secs(cfg.timeout_secs))?
            .with_max_documents_per_request(cfg.max_documents_per_request))
    }

    pub fn with_max_documents_per_request(mut self, max: usize) -> Self {
        self.max_documents_per_request = max.max(1);
        self
    }

    async fn post<T: DeserializeOwned>(
        &self,
        operation: &str,
        documents: &[ChunkRequest],
    ) -> Result<ProviderResponse<T>, ProviderError> {
        let resp = self
            .http
            .post(format!("{}/{operation}", self.endpoint))
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(&serde_json::json!({ "documents": documents }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        Ok(resp.json().await?)
    }

    /// Send `batch` in request-sized slices and merge the answers. A slice
    /// that fails as a whole is recorded as an error for each of its chunks.
    async fn post_all<T: DeserializeOwned>(
        &self,
        operation: &str,
        batch: &[ChunkRequest],
    ) -> ProviderResponse<T> {
        let mut merged = ProviderResponse::default();

        for slice in batch.chunks(self.max_documents_per_request) {
            match self.post(operation, slice).await {
                Ok(resp) => merged.merge(resp),
                Err(e) => {
                    tracing::warn!(
                        "{operation} request for {} chunks failed: {e}",
                        slice.len()
                    );
                    merged.merge(ProviderResponse::failed(slice, &e.to_string()));
                }
            }
        }

        merged
    }
}

impl AnalyticsProvider for TextAnalyticsClient {
    async fn sentiment(&self, batch: &[ChunkRequest]) -> Result<SentimentResponse, ProviderError> {
        Ok(self.post_all("sentiment", batch).await)
    }

    async fn key_phrases(&self, batch: &[ChunkRequest]) -> Result<KeyPhraseResponse, ProviderError> {
        Ok(self.post_all("keyPhrases", batch).await)
    }
}
