use std::path::PathBuf;

use anyhow::Context;
use sart_analysis::{block::extract_sart_blocks, performance::ChunkSummary};
use serde::Serialize;
use tracing::info;

use crate::{io, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BlocksArg {
    /// Path to a single per-participant CSV export
    #[arg(long)]
    input: PathBuf,
    /// Include the post-block survey questions when segmenting
    #[arg(long)]
    with_survey: bool,
    /// Report destination (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BlockReport {
    block: usize,
    #[serde(flatten)]
    summary: ChunkSummary,
}

pub(crate) fn run(arg: &BlocksArg) -> anyhow::Result<()> {
    let records = io::read_trials_file(&arg.input)?;
    let blocks = extract_sart_blocks(&records, arg.with_survey);
    info!(
        "extracted {} block(s) from {}",
        blocks.len(),
        arg.input.display()
    );

    let mut reports = Vec::with_capacity(blocks.len());
    for (idx, block) in blocks.iter().enumerate() {
        let summary = ChunkSummary::from_block(block)
            .with_context(|| format!("failed to score block {}", idx + 1))?;
        reports.push(BlockReport {
            block: idx + 1,
            summary,
        });
    }

    Output::save_json(&reports, arg.output.clone())
}
