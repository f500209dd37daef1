use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A speech, transcript or scraped page: an ordered list of paragraphs plus
/// who said it, where it came from and when.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spiel {
    #[serde(alias = "Speaker", default)]
    pub speaker: String,

    #[serde(rename = "sourceURI", alias = "SourceURI", alias = "sourceUri", default)]
    pub source_uri: String,

    #[serde(
        alias = "Date",
        default,
        with = "date_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,

    #[serde(alias = "Category", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Missing or null paragraph lists load as an empty document.
    #[serde(alias = "Paragraphs", default, deserialize_with = "null_as_empty")]
    pub paragraphs: Vec<String>,
}

impl Spiel {
    pub fn new(speaker: impl Into<String>, source_uri: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            source_uri: source_uri.into(),
            ..Default::default()
        }
    }
}

/// Analytics for one paragraph, or for the whole document when used as a summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphAnalytics {
    pub words: usize,
    pub characters: usize,
    pub sentiment: f64,
    pub key_phrases: BTreeSet<String>,

    /// Set when at least one chunk of the paragraph errored or got no result.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpielAnalytics {
    pub summary: ParagraphAnalytics,
    pub per_paragraph: Vec<ParagraphAnalytics>,
}

/// Output record: the source document with its analytics attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedSpiel {
    #[serde(flatten)]
    pub spiel: Spiel,
    pub analytics: SpielAnalytics,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse the date formats seen in input records and scrape lists.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%B %d, %Y", "%b %d, %Y", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("Unrecognized date: '{raw}'"))),
        }
    }
}
