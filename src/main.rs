use clap::Parser;
use spiel_insights::cli::{self, Cli, Command};
use spiel_insights::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr; stdout carries records (`scrape`, `plan`)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spiel_insights=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = Config::load()?;
    args.apply_overrides(&mut cfg)?;

    match &args.command {
        Command::Analyze { input_dir, output_dir } => {
            cli::analyze::run(&cfg, input_dir, output_dir).await
        }
        Command::Scrape { list, output, json_dir } => {
            cli::scrape::run(&cfg, list, output, json_dir.as_deref()).await
        }
        Command::Plan { input } => cli::plan::run(&cfg, input),
        Command::Config { init } => cli::show_config::run(&cfg, *init),
    }
}
