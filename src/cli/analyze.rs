use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::Config;
use crate::model::AnalyzedSpiel;
use crate::pipeline::analyze_spiel;
use crate::provider::{AnalyticsProvider, TextAnalyticsClient};
use crate::store;

#[derive(Debug, Default)]
pub struct AnalyzeReport {
    pub analyzed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

pub async fn run(cfg: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    let provider = Arc::new(TextAnalyticsClient::from_config(cfg)?);
    let report = analyze_dir(cfg, provider, input_dir, output_dir).await?;

    for (path, err) in &report.failed {
        println!("  {} {}: {err}", style("⚠").yellow(), path.display());
    }
    println!(
        "{} Analyzed {} documents ({} failed) → {}",
        style("✓").green().bold(),
        report.analyzed.len(),
        report.failed.len(),
        output_dir.display()
    );
    Ok(())
}

/// Analyze every `*.json` record in `input_dir`, writing each result under the
/// same file name in `output_dir`. Documents run concurrently, bounded by
/// `cfg.concurrency`; a document that fails is reported and the rest carry on.
pub async fn analyze_dir<P: AnalyticsProvider + 'static>(
    cfg: &Config,
    provider: Arc<P>,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<AnalyzeReport> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let files = store::list_json_files(input_dir)?;
    if files.is_empty() {
        tracing::info!("No .json files in {}", input_dir.display());
    }

    let permits = Arc::new(Semaphore::new(cfg.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for input in files {
        let Some(name) = input.file_name() else { continue };
        let output = output_dir.join(name);
        let provider = provider.clone();
        let permits = permits.clone();
        let max_chars = cfg.max_chars;
        let language = cfg.language.clone();

        tasks.spawn(async move {
            let outcome = match permits.acquire_owned().await {
                Ok(_permit) => {
                    analyze_file(&input, &output, max_chars, &language, provider.as_ref()).await
                }
                Err(e) => Err(e.into()),
            };
            (input, outcome)
        });
    }

    let mut report = AnalyzeReport::default();
    while let Some(joined) = tasks.join_next().await {
        let (input, outcome) = joined.context("Analysis task panicked")?;
        match outcome {
            Ok(_) => {
                tracing::info!("Processed {}", input.display());
                report.analyzed.push(input);
            }
            Err(e) => {
                tracing::warn!("Failed to analyze {}: {e:#}", input.display());
                report.failed.push((input, format!("{e:#}")));
            }
        }
    }

    report.analyzed.sort();
    report.failed.sort();
    Ok(report)
}

pub async fn analyze_file<P: AnalyticsProvider>(
    input: &Path,
    output: &Path,
    max_chars: usize,
    language: &str,
    provider: &P,
) -> Result<AnalyzedSpiel> {
    let spiel = store::load_spiel(input)?;
    let analytics = analyze_spiel(&spiel, max_chars, language, provider).await?;
    let analyzed = AnalyzedSpiel { spiel, analytics };
    store::save_analyzed(output, &analyzed)?;
    Ok(analyzed)
}
