use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::batch::{DEFAULT_LANGUAGE, PROVIDER_MAX_CHARS};

pub const API_KEY_ENV: &str = "SPIEL_INSIGHTS_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the text analytics API; `/sentiment` and `/keyPhrases` are appended
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-document character limit of the provider
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Chunks per HTTP request; larger batches are split across requests
    #[serde(default = "default_max_documents_per_request")]
    pub max_documents_per_request: usize,

    /// Documents analyzed in parallel by `analyze`
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_endpoint() -> String {
    "https://westus.api.cognitive.microsoft.com/text/analytics/v2.0".to_string()
}

fn default_max_chars() -> usize {
    PROVIDER_MAX_CHARS
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_documents_per_request() -> usize {
    1000
}

fn default_concurrency() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            max_chars: default_max_chars(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
            max_documents_per_request: default_max_documents_per_request(),
            concurrency: default_concurrency(),
        }
    }
}

impl Config {
    pub fn data_dir() -> Result<PathBuf> {
        let dir = dirs::home_dir()
            .context("Could not determine home directory")?
            .join(".spiel-insights");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.toml"))
    }

    /// Load `~/.spiel-insights/config.toml`, then apply the API key from the environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.api_key = Some(key);
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            toml::from_str(&contents).context("Failed to parse config.toml")?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, &contents)?;

        // Owner-only: the file may hold an API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            anyhow::bail!("max_chars must be greater than 0");
        }
        if self.max_documents_per_request == 0 {
            anyhow::bail!("max_documents_per_request must be greater than 0");
        }
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be greater than 0");
        }
        url::Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", self.endpoint))?;
        Ok(())
    }

    /// API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let visible: String = key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("****{visible}")
        })
    }
}
