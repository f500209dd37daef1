use crate::aggregate::aggregate;
use crate::batch::build_batch;
use crate::error::AnalyticsError;
use crate::model::{Spiel, SpielAnalytics};
use crate::provider::{AnalyticsProvider, KeyPhraseResponse, SentimentResponse};

/// Analyze one document: chunk it, score every chunk with `provider`, and
/// fold the scores back into paragraph and document analytics.
///
/// A provider call that fails outright is treated as an error on each chunk
/// it carried, so the document still comes back, with every paragraph
/// marked partial.
pub async fn analyze_spiel<P: AnalyticsProvider>(
    spiel: &Spiel,
    max_chars: usize,
    language: &str,
    provider: &P,
) -> Result<SpielAnalytics, AnalyticsError> {
    let batch = build_batch(spiel, max_chars, language);

    let (sentiment, key_phrases) = if batch.is_empty() {
        (SentimentResponse::default(), KeyPhraseResponse::default())
    } else {
        let (sentiment, key_phrases) = tokio::join!(
            provider.sentiment(&batch.requests),
            provider.key_phrases(&batch.requests)
        );
        let sentiment = sentiment.unwrap_or_else(|e| {
            tracing::warn!("Sentiment request for '{}' failed: {e}", spiel.speaker);
            SentimentResponse::failed(&batch.requests, &e.to_string())
        });
        let key_phrases = key_phrases.unwrap_or_else(|e| {
            tracing::warn!("Key phrase request for '{}' failed: {e}", spiel.speaker);
            KeyPhraseResponse::failed(&batch.requests, &e.to_string())
        });
        (sentiment, key_phrases)
    };

    let analytics = aggregate(
        &batch.provenance,
        &batch.paragraph_stats,
        &sentiment,
        &key_phrases,
    )?;

    tracing::info!(
        "Analyzed '{}': {} paragraphs, {} chunks, sentiment {:.3}",
        spiel.speaker,
        analytics.per_paragraph.len(),
        batch.len(),
        analytics.summary.sentiment
    );

    Ok(analytics)
}
