use std::collections::{HashMap, HashSet};

use crate::batch::{ParagraphStats, Provenance};
use crate::error::AnalyticsError;
use crate::model::{ParagraphAnalytics, SpielAnalytics};
use crate::provider::{DocumentError, KeyPhraseResponse, SentimentResponse};

/// Fold per-chunk provider results back into paragraph and document analytics.
///
/// Each chunk's score is scaled by its provenance weight and added to its
/// paragraph; key phrases are unioned per paragraph and for the document.
/// The document sentiment is the character-weighted mean of the paragraph
/// sentiments, and 0 for a document without characters.
///
/// Errored, missing and unknown chunk IDs never fail the call: errored or
/// missing chunks contribute nothing and mark their paragraph `partial`,
/// unknown IDs are logged and skipped. The only error is provenance that
/// points outside `paragraph_stats`.
pub fn aggregate(
    provenance: &HashMap<usize, Provenance>,
    paragraph_stats: &[ParagraphStats],
    sentiment: &SentimentResponse,
    key_phrases: &KeyPhraseResponse,
) -> Result<SpielAnalytics, AnalyticsError> {
    for (&chunk_id, p) in provenance {
        if p.paragraph >= paragraph_stats.len() {
            return Err(AnalyticsError::InconsistentProvenance {
                chunk_id,
                paragraph: p.paragraph,
                paragraphs: paragraph_stats.len(),
            });
        }
    }

    let mut per_paragraph: Vec<ParagraphAnalytics> = paragraph_stats
        .iter()
        .map(|s| ParagraphAnalytics {
            words: s.words,
            characters: s.characters,
            ..Default::default()
        })
        .collect();

    log_errors("sentiment", &sentiment.errors);
    log_errors("key phrase", &key_phrases.errors);

    let mut scored = HashSet::new();
    for doc in &sentiment.documents {
        let Some((chunk_id, p)) = resolve(provenance, &doc.id, "sentiment") else {
            continue;
        };
        scored.insert(chunk_id);
        per_paragraph[p.paragraph].sentiment += doc.score * p.weight;
    }

    let mut summary_phrases = std::collections::BTreeSet::new();
    let mut phrased = HashSet::new();
    for doc in &key_phrases.documents {
        let Some((chunk_id, p)) = resolve(provenance, &doc.id, "key phrase") else {
            continue;
        };
        phrased.insert(chunk_id);
        for phrase in &doc.key_phrases {
            per_paragraph[p.paragraph].key_phrases.insert(phrase.clone());
            summary_phrases.insert(phrase.clone());
        }
    }

    for (chunk_id, p) in provenance {
        if !scored.contains(chunk_id) || !phrased.contains(chunk_id) {
            per_paragraph[p.paragraph].partial = true;
        }
    }

    let mut summary = ParagraphAnalytics {
        words: per_paragraph.iter().map(|a| a.words).sum(),
        characters: per_paragraph.iter().map(|a| a.characters).sum(),
        key_phrases: summary_phrases,
        partial: per_paragraph.iter().any(|a| a.partial),
        ..Default::default()
    };

    if summary.characters == 0 {
        if !per_paragraph.is_empty() {
            tracing::debug!("Document has no characters; sentiment defaults to 0");
        }
    } else {
        let total = summary.characters as f64;
        summary.sentiment = per_paragraph
            .iter()
            .map(|a| a.sentiment * (a.characters as f64 / total))
            .sum();
    }

    Ok(SpielAnalytics {
        summary,
        per_paragraph,
    })
}

fn resolve(
    provenance: &HashMap<usize, Provenance>,
    id: &str,
    kind: &str,
) -> Option<(usize, Provenance)> {
    let found = id
        .parse::<usize>()
        .ok()
        .and_then(|chunk_id| provenance.get(&chunk_id).map(|p| (chunk_id, *p)));
    if found.is_none() {
        tracing::warn!("Ignoring {kind} result for unknown chunk id '{id}'");
    }
    found
}

fn log_errors(kind: &str, errors: &[DocumentError]) {
    for e in errors {
        match &e.id {
            Some(id) => tracing::warn!("Error from {kind} API for chunk {id}: {}", e.message),
            None => tracing::warn!("Error from {kind} API: {}", e.message),
        }
    }
}
