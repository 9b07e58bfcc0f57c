use std::path::{Path, PathBuf};

use anyhow::Context;
use sart_analysis::{participant, row::SummaryRow};
use tracing::{debug, info, warn};

use crate::{
    export,
    io::{self, Stage},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CompileArg {
    /// Directory holding the practice/, experiment/ and follow_up/ exports
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Summary table destination (defaults to <data-dir>/compiled.csv)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Block analysis table destination (defaults to <data-dir>/alt_compiled.csv)
    #[arg(long)]
    alt_output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CompileArg) -> anyhow::Result<()> {
    let CompileArg {
        data_dir,
        output,
        alt_output,
    } = arg;

    let practice_paths = io::stage_csv_paths(data_dir, Stage::Practice)?;
    if practice_paths.is_empty() {
        warn!("no practice exports found under {}", data_dir.display());
    }
    info!("compiling {} participant(s)", practice_paths.len());

    let mut rows = Vec::with_capacity(practice_paths.len());
    for path in &practice_paths {
        match compile_participant(data_dir, path) {
            Ok(row) => rows.push(row),
            Err(err) => warn!("skipping {}: {err:#}", path.display()),
        }
    }

    let output_path = output
        .clone()
        .unwrap_or_else(|| data_dir.join("compiled.csv"));
    export::write_summary_csv(&rows, Output::open(output_path.clone())?)?;
    info!("wrote {} row(s) to {}", rows.len(), output_path.display());

    let alt_path = alt_output
        .clone()
        .unwrap_or_else(|| data_dir.join("alt_compiled.csv"));
    export::write_alt_csv(&rows, Output::open(alt_path.clone())?)?;
    info!("wrote block analysis table to {}", alt_path.display());

    Ok(())
}

/// Compiles one participant, keyed by their practice export. Experiment
/// and follow-up stages that fail to load or compile are flagged rather
/// than fatal.
fn compile_participant(data_dir: &Path, practice_path: &Path) -> anyhow::Result<SummaryRow> {
    let records = io::read_trials_file(practice_path)?;
    let mut row = participant::compile_practice(&records)
        .with_context(|| format!("failed to compile {}", practice_path.display()))?;

    let id = row
        .get_str("id")
        .context("practice export produced no participant id")?
        .to_owned();
    let passed_practice = row.get_bool("passed_practice").unwrap_or(false);
    debug!("compiled practice stage for participant {id}");

    let mut missing_data = false;
    for stage in [Stage::Experiment, Stage::FollowUp] {
        let stage_path = data_dir.join(stage.dir_name()).join(format!("{id}.csv"));
        if stage_path.exists() {
            match compile_stage(stage, &stage_path, passed_practice) {
                Ok(stage_row) => row.merge(stage_row),
                Err(err) => {
                    warn!("participant {id}: {err:#}");
                    missing_data = true;
                }
            }
        } else if stage == Stage::FollowUp || passed_practice {
            // A missing experiment file is expected for participants who
            // never passed practice.
            missing_data = true;
        }
    }
    row.set("missing_data", missing_data);

    Ok(row)
}

fn compile_stage(
    stage: Stage,
    path: &Path,
    passed_practice: bool,
) -> anyhow::Result<SummaryRow> {
    let records = io::read_trials_file(path)?;
    let row = match stage {
        Stage::Experiment => participant::compile_experiment(&records),
        Stage::FollowUp => participant::compile_follow_up(&records, passed_practice),
        Stage::Practice => unreachable!("practice is compiled up front"),
    };
    row.with_context(|| format!("failed to compile {}", path.display()))
}
