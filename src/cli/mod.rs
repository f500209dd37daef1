pub mod analyze;
pub mod plan;
pub mod scrape;
pub mod show_config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "spiel-insights",
    about = "Sentiment and key-phrase analytics for speeches, chunked for size-limited text analytics APIs."
)]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Text analytics API key (overrides config and SPIEL_INSIGHTS_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Per-chunk character limit (default: 5120)
    #[arg(long, global = true)]
    pub max_chars: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze every .json document in a directory
    Analyze {
        /// Directory of input records
        input_dir: PathBuf,

        /// Directory for analyzed records (created if missing)
        output_dir: PathBuf,
    },

    /// Fetch pages from a `speaker;uri;date` list and analyze them
    Scrape {
        /// List file, one `speaker;uri;date` target per line
        list: PathBuf,

        /// Output file for `speaker;date;sentiment` records
        output: PathBuf,

        /// Also write the full analyzed records to this directory
        #[arg(long)]
        json_dir: Option<PathBuf>,
    },

    /// Show how a document would be chunked, without calling the API
    Plan {
        /// Input record
        input: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    /// Layer command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, cfg: &mut Config) -> anyhow::Result<()> {
        if let Some(key) = &self.api_key {
            cfg.api_key = Some(key.clone());
        }
        if let Some(max) = self.max_chars {
            cfg.max_chars = max;
        }
        cfg.validate()
    }
}
