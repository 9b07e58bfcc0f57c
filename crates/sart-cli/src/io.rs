//! Discovery and loading of per-participant CSV exports.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sart_analysis::trial::TrialRecord;

/// Stage subdirectories of the data directory, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Practice,
    Experiment,
    FollowUp,
}

impl Stage {
    pub fn dir_name(self) -> &'static str {
        match self {
            Stage::Practice => "practice",
            Stage::Experiment => "experiment",
            Stage::FollowUp => "follow_up",
        }
    }
}

/// All CSV exports of a stage, sorted for deterministic processing order.
pub fn stage_csv_paths(data_dir: &Path, stage: Stage) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = data_dir.join(stage.dir_name()).join("*.csv");
    let pattern = pattern.to_string_lossy().into_owned();
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
        paths.push(entry.with_context(|| format!("unreadable path while scanning {pattern}"))?);
    }
    paths.sort();
    Ok(paths)
}

/// Loads every trial row of one export, in document order.
pub fn read_trials_file(path: &Path) -> anyhow::Result<Vec<TrialRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: TrialRecord =
            result.with_context(|| format!("failed to parse {}", path.display()))?;
        records.push(record);
    }
    Ok(records)
}
