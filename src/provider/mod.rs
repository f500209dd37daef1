pub mod text_analytics;

use serde::{Deserialize, Serialize};

use crate::batch::ChunkRequest;
use crate::error::ProviderError;

pub use text_analytics::TextAnalyticsClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentDocument {
    pub id: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPhraseDocument {
    pub id: String,
    #[serde(rename = "keyPhrases", default)]
    pub key_phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentError {
    #[serde(default)]
    pub id: Option<String>,
    pub message: String,
}

/// `{documents, errors}` envelope shared by both request types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse<T> {
    #[serde(default = "Vec::new")]
    pub documents: Vec<T>,
    #[serde(default)]
    pub errors: Vec<DocumentError>,
}

impl<T> Default for ProviderResponse<T> {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> ProviderResponse<T> {
    /// A response in which every chunk of `requests` failed with `message`.
    pub fn failed(requests: &[ChunkRequest], message: &str) -> Self {
        Self {
            documents: Vec::new(),
            errors: requests
                .iter()
                .map(|r| DocumentError {
                    id: Some(r.id.clone()),
                    message: message.to_string(),
                })
                .collect(),
        }
    }

    pub fn merge(&mut self, other: ProviderResponse<T>) {
        self.documents.extend(other.documents);
        self.errors.extend(other.errors);
    }
}

pub type SentimentResponse = ProviderResponse<SentimentDocument>;
pub type KeyPhraseResponse = ProviderResponse<KeyPhraseDocument>;

/// Remote sentiment and key-phrase scoring of a batch of chunks.
///
/// Implementations report per-chunk failures inside the response. An `Err`
/// means the whole request failed; callers degrade it to per-chunk errors.
pub trait AnalyticsProvider: Send + Sync {
    fn sentiment(
        &self,
        batch: &[ChunkRequest],
    ) -> impl Future<Output = Result<SentimentResponse, ProviderError>> + Send;

    fn key_phrases(
        &self,
        batch: &[ChunkRequest],
    ) -> impl Future<Output = Result<KeyPhraseResponse, ProviderError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    fn parse<T: DeserializeOwned>(body: &str) -> ProviderResponse<T> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_generic_parse_without_documents() {
        let resp: SentimentResponse = parse(r#"{"errors": [{"id": "0", "message": "bad"}]}"#);
        assert!(resp.documents.is_empty());
        assert_eq!(resp.errors[0].id.as_deref(), Some("0"));

        let resp: KeyPhraseResponse = parse(r#"{"documents": [{"id": "1", "keyPhrases": ["liberty"]}]}"#);
        assert_eq!(resp.documents[0].key_phrases, vec!["liberty"]);
        assert!(resp.errors.is_empty());
    }
}
