//! Build documents from web pages listed in a `speaker;uri;date` file.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use url::Url;

use crate::model::{Spiel, SpielAnalytics, parse_date};

/// Paragraph text lives in the text nodes under these elements.
const PARAGRAPH_SELECTOR: &str = "span.displaytext";

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeTarget {
    pub speaker: String,
    pub uri: Url,
    /// Date exactly as written in the list file
    pub raw_date: String,
}

/// Parse a list file. Blank lines and `#` comments are ignored; malformed
/// lines are skipped with a warning.
pub fn parse_target_list(contents: &str) -> Vec<ScrapeTarget> {
    let mut targets = Vec::new();

    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.splitn(3, ';').map(str::trim).collect();
        let [speaker, uri, raw_date] = parts.as_slice() else {
            tracing::warn!("Skipping line {}: expected speaker;uri;date", lineno + 1);
            continue;
        };

        let uri = match Url::parse(uri) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Skipping line {}: invalid URI '{uri}': {e}", lineno + 1);
                continue;
            }
        };

        targets.push(ScrapeTarget {
            speaker: speaker.to_string(),
            uri,
            raw_date: raw_date.to_string(),
        });
    }

    targets
}

/// Trimmed, non-empty text nodes under every paragraph container, in document order.
pub fn extract_paragraphs(html: &str) -> Result<Vec<String>> {
    let selector = Selector::parse(PARAGRAPH_SELECTOR)
        .map_err(|e| anyhow::anyhow!("Invalid selector {PARAGRAPH_SELECTOR}: {e}"))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .flat_map(|el| el.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect())
}

pub async fn fetch_spiel(client: &reqwest::Client, target: &ScrapeTarget) -> Result<Spiel> {
    let resp = client
        .get(target.uri.clone())
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", target.uri))?;

    if !resp.status().is_success() {
        anyhow::bail!("Fetching {} returned {}", target.uri, resp.status());
    }

    let html = resp.text().await?;
    let paragraphs = extract_paragraphs(&html)?;
    if paragraphs.is_empty() {
        tracing::warn!("No paragraphs found at {}", target.uri);
    }

    let date = parse_date(&target.raw_date);
    if date.is_none() {
        tracing::warn!("Unrecognized date '{}' for {}", target.raw_date, target.speaker);
    }

    Ok(Spiel {
        speaker: target.speaker.clone(),
        source_uri: target.uri.to_string(),
        date,
        category: None,
        paragraphs,
    })
}

/// `speaker;date;sentiment` summary record.
pub fn summary_line(target: &ScrapeTarget, analytics: &SpielAnalytics) -> String {
    format!(
        "{};{};{}",
        target.speaker, target.raw_date, analytics.summary.sentiment
    )
}
