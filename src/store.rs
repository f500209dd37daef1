use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::{AnalyzedSpiel, Spiel};

pub fn load_spiel(path: &Path) -> Result<Spiel> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn save_analyzed(path: &Path, analyzed: &AnalyzedSpiel) -> Result<()> {
    let contents = serde_json::to_string_pretty(analyzed)?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// `*.json` files directly inside `dir`, sorted by path.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    Ok(files)
}
