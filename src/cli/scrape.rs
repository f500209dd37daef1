use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;

use crate::config::Config;
use crate::model::AnalyzedSpiel;
use crate::pipeline::analyze_spiel;
use crate::provider::{AnalyticsProvider, TextAnalyticsClient};
use crate::scrape::{self, ScrapeTarget};
use crate::store;

pub async fn run(cfg: &Config, list: &Path, output: &Path, json_dir: Option<&Path>) -> Result<()> {
    let contents = std::fs::read_to_string(list)
        .with_context(|| format!("Failed to read list file {}", list.display()))?;
    let targets = scrape::parse_target_list(&contents);
    if targets.is_empty() {
        println!("No targets in {}", list.display());
        return Ok(());
    }

    let provider = TextAnalyticsClient::from_config(cfg)?;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()?;

    let written = scrape_targets(cfg, &provider, &http, &targets, output, json_dir).await?;

    println!(
        "{} Scraped {written}/{} targets → {}",
        style("✓").green().bold(),
        targets.len(),
        output.display()
    );
    Ok(())
}

/// Fetch, analyze and record each target in order. A target that cannot be
/// fetched is logged and skipped. Returns the number of records written.
pub async fn scrape_targets<P: AnalyticsProvider>(
    cfg: &Config,
    provider: &P,
    http: &reqwest::Client,
    targets: &[ScrapeTarget],
    output: &Path,
    json_dir: Option<&Path>,
) -> Result<usize> {
    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut out = std::io::BufWriter::new(file);

    if let Some(dir) = json_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut written = 0;
    for (i, target) in targets.iter().enumerate() {
        tracing::info!("Processing {}", target.uri);

        let spiel = match scrape::fetch_spiel(http, target).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Skipping {}: {e:#}", target.uri);
                continue;
            }
        };

        let analytics = analyze_spiel(&spiel, cfg.max_chars, &cfg.language, provider).await?;
        let line = scrape::summary_line(target, &analytics);
        writeln!(out, "{line}")?;
        println!("{line}");

        if let Some(dir) = json_dir {
            let path = dir.join(format!("{:03}-{}.json", i + 1, slug(&target.speaker)));
            store::save_analyzed(&path, &AnalyzedSpiel { spiel, analytics })?;
        }
        written += 1;
    }

    out.flush()?;
    Ok(written)
}

fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.split('-').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("-");
    if slug.is_empty() { "spiel".to_string() } else { slug }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("George Washington"), "george-washington");
        assert_eq!(slug("  John F. Kennedy "), "john-f-kennedy");
        assert_eq!(slug("???"), "spiel");
    }
}
