use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::model::Dataset;
use super::parse::parse_dataset;

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file {}", path.display()))?;

    let dataset = parse_dataset(&raw)
        .with_context(|| format!("failed to parse dataset file {}", path.display()))?;

    info!(
        "loaded {} jobs in {} clusters ({} cluster similarities, {})",
        dataset.job_count(),
        dataset.clusters.len(),
        dataset.similarity.len(),
        if dataset.has_depth { "3d" } else { "2d" }
    );

    Ok(dataset)
}
