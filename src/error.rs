use thiserror::Error;

/// Failures talking to the remote text analytics service.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No API key configured. Set SPIEL_INSIGHTS_API_KEY or pass --api-key")]
    MissingApiKey,
}

/// Errors raised by the chunk/aggregate core.
///
/// Everything local to one chunk or paragraph is absorbed and logged; only
/// structural problems that point at a bug in batch building surface here.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(
        "Chunk {chunk_id} is mapped to paragraph {paragraph}, but the document only has {paragraphs} paragraphs"
    )]
    InconsistentProvenance {
        chunk_id: usize,
        paragraph: usize,
        paragraphs: usize,
    },
}
