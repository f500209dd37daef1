use anyhow::Result;
use console::style;

use crate::config::Config;

pub fn run(cfg: &Config, init: bool) -> Result<()> {
    let path = Config::config_path()?;

    if init {
        if path.exists() {
            println!("{} Config already exists at {}", style("ℹ").blue(), path.display());
        } else {
            // Defaults only: keys from the environment or --api-key stay off disk.
            Config::default().save()?;
            println!("{} Wrote {}", style("✓").green().bold(), path.display());
        }
        println!();
    }

    println!("Config file:       {}", path.display());
    println!("Endpoint:          {}", cfg.endpoint);
    println!(
        "API key:           {}",
        cfg.masked_api_key().unwrap_or_else(|| "not set".to_string())
    );
    println!("Max chars:         {}", cfg.max_chars);
    println!("Language:          {}", cfg.language);
    println!("Timeout:           {}s", cfg.timeout_secs);
    println!("Docs per request:  {}", cfg.max_documents_per_request);
    println!("Concurrency:       {}", cfg.concurrency);
    Ok(())
}
