use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::batch::{Batch, ParagraphStats, build_batch};
use crate::chunking::char_len;
use crate::config::Config;
use crate::store;

#[derive(Debug, Serialize)]
pub struct PlannedChunk {
    pub id: usize,
    pub paragraph: usize,
    pub weight: f64,
    pub characters: usize,
}

#[derive(Debug, Serialize)]
pub struct Plan {
    pub max_chars: usize,
    pub chunks: Vec<PlannedChunk>,
    pub paragraphs: Vec<ParagraphStats>,
}

impl Plan {
    pub fn from_batch(batch: &Batch, max_chars: usize) -> Self {
        let chunks = batch
            .requests
            .iter()
            .enumerate()
            .filter_map(|(id, req)| {
                batch.provenance.get(&id).map(|p| PlannedChunk {
                    id,
                    paragraph: p.paragraph,
                    weight: p.weight,
                    characters: char_len(&req.text),
                })
            })
            .collect();
        Self {
            max_chars,
            chunks,
            paragraphs: batch.paragraph_stats.clone(),
        }
    }
}

pub fn run(cfg: &Config, input: &Path) -> Result<()> {
    let spiel = store::load_spiel(input)?;
    let batch = build_batch(&spiel, cfg.max_chars, &cfg.language);
    let plan = Plan::from_batch(&batch, cfg.max_chars);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
