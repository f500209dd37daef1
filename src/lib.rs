pub mod aggregate;
pub mod batch;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod scrape;
pub mod store;

pub use aggregate::aggregate;
pub use batch::{Batch, ChunkRequest, ParagraphStats, Provenance, build_batch};
pub use chunking::split_paragraph;
pub use error::{AnalyticsError, ProviderError};
pub use model::{AnalyzedSpiel, ParagraphAnalytics, Spiel, SpielAnalytics};
pub use pipeline::analyze_spiel;
pub use provider::AnalyticsProvider;
