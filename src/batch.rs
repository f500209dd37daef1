use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chunking::{char_len, split_paragraph};
use crate::model::Spiel;

/// Hard per-document limit of the text analytics API, in characters.
pub const PROVIDER_MAX_CHARS: usize = 5120;

pub const DEFAULT_LANGUAGE: &str = "en";

/// One entry of a sentiment or key-phrase request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRequest {
    pub id: String,
    pub language: String,
    pub text: String,
}

/// Where a chunk came from and how much of its paragraph it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Provenance {
    pub paragraph: usize,
    pub weight: f64,
}

/// Word and character counts of an original, unchunked paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParagraphStats {
    pub words: usize,
    pub characters: usize,
}

impl ParagraphStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: char_len(text),
        }
    }
}

/// Everything needed to submit a document and fold the results back.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub requests: Vec<ChunkRequest>,
    pub provenance: HashMap<usize, Provenance>,
    pub paragraph_stats: Vec<ParagraphStats>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }
}

/// Chunk every paragraph of `spiel` and number the chunks 0, 1, 2, ... in
/// document order.
///
/// Weights are each chunk's share of the summed (trimmed) chunk lengths of
/// its paragraph, so they add up to 1.0 per paragraph. Paragraph stats are
/// taken from the original text, independent of chunking. Empty paragraphs
/// keep their slot in `paragraph_stats` but contribute no chunk.
pub fn build_batch(spiel: &Spiel, max_chars: usize, language: &str) -> Batch {
    let mut batch = Batch {
        paragraph_stats: Vec::with_capacity(spiel.paragraphs.len()),
        ..Default::default()
    };

    for (paragraph, text) in spiel.paragraphs.iter().enumerate() {
        batch.paragraph_stats.push(ParagraphStats::of(text));

        let chunks = split_paragraph(text, max_chars);
        let total: usize = chunks.iter().map(|c| char_len(c)).sum();

        for chunk in chunks {
            let weight = if total == 0 {
                0.0
            } else {
                char_len(&chunk) as f64 / total as f64
            };
            let id = batch.requests.len();
            batch.provenance.insert(id, Provenance { paragraph, weight });
            batch.requests.push(ChunkRequest {
                id: id.to_string(),
                language: language.to_string(),
                text: chunk,
            });
        }
    }

    tracing::debug!(
        "Built batch of {} chunks from {} paragraphs ({})",
        batch.requests.len(),
        batch.paragraph_stats.len(),
        spiel.speaker
    );

    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spiel(paragraphs: &[&str]) -> Spiel {
        Spiel {
            paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
            ..Spiel::new("Test Speaker", "http://example.com/speech")
        }
    }

    #[test]
    fn test_empty_paragraph_contributes_no_chunk() {
        let batch = build_batch(&spiel(&["hello world", ""]), PROVIDER_MAX_CHARS, "en");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.requests[0].id, "0");
        assert_eq!(batch.requests[0].text, "hello world");
        assert_eq!(batch.requests[0].language, "en");
        assert_eq!(
            batch.provenance[&0],
            Provenance { paragraph: 0, weight: 1.0 }
        );
        assert_eq!(batch.paragraph_stats.len(), 2);
        assert_eq!(batch.paragraph_stats[1], ParagraphStats::default());
    }

    #[test]
    fn test_ids_increase_across_paragraphs() {
        let long = vec!["word"; 100].join(" "); // 499 chars
        let batch = build_batch(&spiel(&["first", &long, "", "last"]), 200, "en");

        let ids: Vec<String> = batch.requests.iter().map(|r| r.id.clone()).collect();
        let expected: Vec<String> = (0..batch.len()).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);

        assert_eq!(batch.provenance[&0].paragraph, 0);
        assert_eq!(batch.provenance[&(batch.len() - 1)].paragraph, 3);
        let middle: Vec<_> = batch.provenance.values().filter(|p| p.paragraph == 1).collect();
        assert_eq!(middle.len(), 3);
    }

    #[test]
    fn test_split_weights_sum_to_one() {
        let long: String = (0..3000).map(|i| format!("w{}", i % 97)).collect::<Vec<_>>().join(" ");
        let batch = build_batch(&spiel(&[&long, "short one"]), PROVIDER_MAX_CHARS, "en");

        let sum: f64 = batch
            .provenance
            .values()
            .filter(|p| p.paragraph == 0)
            .map(|p| p.weight)
            .sum();
        assert!(batch.provenance.values().filter(|p| p.paragraph == 0).count() > 1);
        assert!((sum - 1.0).abs() < 1e-9, "weights summed to {sum}");
    }

    #[test]
    fn test_stats_use_original_text() {
        let batch = build_batch(&spiel(&["  spaced   out  text "]), PROVIDER_MAX_CHARS, "en");
        assert_eq!(batch.paragraph_stats[0], ParagraphStats { words: 3, characters: 21 });
    }

    #[test]
    fn test_empty_document() {
        let batch = build_batch(&spiel(&[]), PROVIDER_MAX_CHARS, "en");
        assert!(batch.is_empty());
        assert!(batch.provenance.is_empty());
        assert!(batch.paragraph_stats.is_empty());
    }
}
