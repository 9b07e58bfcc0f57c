//! Participant-level compilation across the three experiment stages.
//!
//! Each stage export compiles to one [`SummaryRow`]; the driver merges the
//! practice, experiment, and follow-up rows of a participant into the
//! single row it writes to the aggregate table.

use derive_more::{Display, Error, From};

use sart_stats::{
    change::ChangeCounts,
    descriptive::{DescriptiveStats, mean, weighted_mean},
    regression::LinearFit,
    round::round_places,
    trapezoid::trapezoid,
};

use crate::{
    ROUND_PLACES,
    block::extract_sart_blocks,
    performance::{ChunkSummary, ScoreError},
    row::SummaryRow,
    survey::{
        ANTICIPATED_QUESTION_FIELDS, BEHAVIOURAL_NODE_FIELDS, DEMOGRAPHICS_NODE_FIELDS,
        PASSED_PRACTICE_NODE_ID, RETROSPECTIVE_NODE_FIELDS, likert_rating, response_for_node,
    },
    trial::TrialRecord,
};

/// Row index of the rest screen preceding the follow-up battery; its
/// timestamp records the delay between the task and the follow-up.
pub const PWMT_DELAY_TRIAL_INDEX: u64 = 46;

/// A stage export that cannot be compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum CompileError {
    #[display("export holds no trial rows")]
    EmptyRecords,
    #[display("column {column} carries no value")]
    MissingColumn { column: &'static str },
    #[display("export holds no task blocks")]
    NoBlocks,
    #[display("{_0}")]
    #[from]
    Score(ScoreError),
}

/// Compiles a practice-stage export.
///
/// The first block is the warm-up; every later block is an attempt at the
/// pass criterion, timed separately.
pub fn compile_practice(records: &[TrialRecord]) -> Result<SummaryRow, CompileError> {
    let last = records.last().ok_or(CompileError::EmptyRecords)?;

    let mut row = SummaryRow::new();
    row.set(
        "id",
        first_column_value(records, |t| t.participant_id.as_deref(), "participant_id")?,
    );
    row.set(
        "practice_condition",
        first_column_value(
            records,
            |t| t.practice_condition.as_deref(),
            "practice_condition",
        )?,
    );
    row.set(
        "passed_practice",
        records
            .iter()
            .any(|t| t.internal_node_id == PASSED_PRACTICE_NODE_ID),
    );

    let blocks = extract_sart_blocks(records, false);
    let mut num_blk2s = 0_i64;
    for (idx, block) in blocks.iter().enumerate() {
        if idx == 0 {
            row.set("time_practice_blk1_ms", block.elapsed_ms());
        } else {
            num_blk2s += 1;
            row.set(format!("time_practice_blk2_{idx}_ms"), block.elapsed_ms());
        }
    }
    row.set("num_practice_blk2s", num_blk2s);
    row.set("time_practice_ms", last.time_elapsed);

    Ok(row)
}

/// Compiles an experiment-stage export: per-block summaries plus the
/// participant-level aggregates over the block series.
#[expect(clippy::cast_precision_loss)]
pub fn compile_experiment(records: &[TrialRecord]) -> Result<SummaryRow, CompileError> {
    let last = records.last().ok_or(CompileError::EmptyRecords)?;

    let blocks = extract_sart_blocks(records, true);
    if blocks.is_empty() {
        return Err(CompileError::NoBlocks);
    }
    let mut chunks = Vec::with_capacity(blocks.len());
    for block in &blocks {
        chunks.push(ChunkSummary::from_block(block)?);
    }

    let mut row = SummaryRow::new();
    if let Some(condition) = records.iter().find_map(|t| t.condition.clone()) {
        row.set("condition", condition);
    }
    if let Some(order) = records.iter().find_map(|t| t.block_order.clone()) {
        row.set("block_order", order);
    }

    for (label, trial_index) in ANTICIPATED_QUESTION_FIELDS {
        let rating = records
            .iter()
            .find(|t| t.trial_index == *trial_index)
            .and_then(likert_rating);
        row.set(*label, rating);
    }

    row.set("num_blocks", chunks.len());
    row.set(
        "num_trials",
        chunks
            .iter()
            .map(|chunk| chunk.performance.num_trials)
            .sum::<usize>(),
    );
    row.set("trials_per_block", chunks[0].performance.num_trials);

    for (idx, chunk) in chunks.iter().enumerate() {
        insert_block_summary(&mut row, idx + 1, chunk);
    }

    // Participant-level no-go window averages, weighted by pool size.
    row.set(
        "nogo_error_prev_rt_avg",
        weighted_mean(chunks.iter().filter_map(|chunk| {
            let p = &chunk.performance;
            p.nogo_prev4_avg.map(|avg| (avg, p.num_prev4_rts as f64))
        })),
    );
    row.set(
        "nogo_error_next_rt_avg",
        weighted_mean(chunks.iter().filter_map(|chunk| {
            let p = &chunk.performance;
            p.nogo_next4_avg.map(|avg| (avg, p.num_next4_rts as f64))
        })),
    );

    let effort_points = rating_points(&chunks, |chunk| chunk.effort);
    insert_rating_series(&mut row, "effort", &effort_points);
    let discomfort_points = rating_points(&chunks, |chunk| chunk.discomfort);
    insert_rating_series(&mut row, "discomfort", &discomfort_points);

    let accuracies: Vec<f64> = chunks
        .iter()
        .map(|chunk| chunk.performance.accuracy)
        .collect();
    if let Some(stats) = DescriptiveStats::new(accuracies.iter().copied()) {
        row.set("avg_accuracy", round_places(stats.mean, ROUND_PLACES));
        row.set("max_accuracy", stats.max);
        row.set("min_accuracy", stats.min);
    }
    row.set("start_accuracy", accuracies.first().copied());
    row.set("end_accuracy", accuracies.last().copied());
    let accuracy_points: Vec<(usize, f64)> = accuracies
        .iter()
        .enumerate()
        .map(|(idx, value)| (idx + 1, *value))
        .collect();
    insert_trend_metrics(&mut row, "accuracy", &accuracy_points);
    row.set(
        "auc_accuracy",
        round_places(trapezoid(&accuracies), ROUND_PLACES),
    );

    if chunks.iter().all(|chunk| chunk.block_type.is_some()) {
        insert_difficulty_rollups(&mut row, &chunks);
    }

    row.set("time_experiment_ms", last.time_elapsed);

    Ok(row)
}

/// Compiles a follow-up-stage export. Retrospective task questions are
/// only asked of participants who passed practice.
pub fn compile_follow_up(
    records: &[TrialRecord],
    include_retrospective: bool,
) -> Result<SummaryRow, CompileError> {
    let last = records.last().ok_or(CompileError::EmptyRecords)?;

    let mut row = SummaryRow::new();
    for (label, node_id) in DEMOGRAPHICS_NODE_FIELDS {
        row.set(*label, response_for_node(records, node_id, false));
    }
    for (label, node_id) in BEHAVIOURAL_NODE_FIELDS {
        row.set(*label, response_for_node(records, node_id, true));
    }

    if let Some(delay) = records
        .iter()
        .find(|t| t.trial_index == PWMT_DELAY_TRIAL_INDEX)
    {
        row.set("time_pwmt_delay_ms", delay.time_elapsed);
    }
    row.set("time_follow_up_ms", last.time_elapsed);

    if include_retrospective {
        for (label, node_id) in RETROSPECTIVE_NODE_FIELDS {
            row.set(*label, response_for_node(records, node_id, true));
        }
    }

    Ok(row)
}

fn first_column_value<'a, F>(
    records: &'a [TrialRecord],
    get: F,
    column: &'static str,
) -> Result<String, CompileError>
where
    F: FnMut(&'a TrialRecord) -> Option<&'a str>,
{
    records
        .iter()
        .find_map(get)
        .map(str::to_owned)
        .ok_or(CompileError::MissingColumn { column })
}

fn insert_block_summary(row: &mut SummaryRow, position: usize, chunk: &ChunkSummary) {
    let p = &chunk.performance;
    row.set(format!("blk{position}_num_trials"), p.num_trials);
    row.set(format!("blk{position}_rt_avg"), p.rt_avg);
    row.set(format!("blk{position}_anticipated"), p.anticipated);
    row.set(format!("blk{position}_accuracy"), p.accuracy);
    row.set(format!("blk{position}_go_errors"), p.go_errors);
    row.set(format!("blk{position}_nogo_errors"), p.nogo_errors);
    row.set(format!("blk{position}_nogo_prev4_avg"), p.nogo_prev4_avg);
    row.set(format!("blk{position}_num_prev4_rts"), p.num_prev4_rts);
    row.set(format!("blk{position}_nogo_next4_avg"), p.nogo_next4_avg);
    row.set(format!("blk{position}_num_next4_rts"), p.num_next4_rts);
    row.set(format!("blk{position}_effort"), chunk.effort);
    row.set(format!("blk{position}_discomfort"), chunk.discomfort);
    if let Some(block_type) = &chunk.block_type {
        row.set(format!("blk{position}_block_type"), block_type.clone());
    }
}

/// 1-based block positions of the blocks that carry a rating.
fn rating_points<F>(chunks: &[ChunkSummary], get: F) -> Vec<(usize, i64)>
where
    F: Fn(&ChunkSummary) -> Option<i64>,
{
    chunks
        .iter()
        .enumerate()
        .filter_map(|(idx, chunk)| get(chunk).map(|value| (idx + 1, value)))
        .collect()
}

/// Peak-end, trend, and area summaries of a rating series.
#[expect(clippy::cast_precision_loss)]
fn insert_rating_series(row: &mut SummaryRow, label: &str, points: &[(usize, i64)]) {
    let values: Vec<i64> = points.iter().map(|(_, value)| *value).collect();
    row.set(format!("start_{label}"), values.first().copied());
    row.set(format!("peak_{label}"), values.iter().max().copied());
    row.set(format!("end_{label}"), values.last().copied());
    row.set(
        format!("avg_{label}"),
        mean(values.iter().map(|value| *value as f64))
            .map(|avg| round_places(avg, ROUND_PLACES)),
    );

    let float_points: Vec<(usize, f64)> = points
        .iter()
        .map(|(position, value)| (*position, *value as f64))
        .collect();
    insert_trend_metrics(row, label, &float_points);

    let float_values: Vec<f64> = values.iter().map(|value| *value as f64).collect();
    row.set(
        format!("auc_{label}"),
        round_places(trapezoid(&float_values), ROUND_PLACES),
    );
}

/// Regression and direction-of-change summaries of a series over block
/// positions.
#[expect(clippy::cast_precision_loss)]
fn insert_trend_metrics(row: &mut SummaryRow, label: &str, points: &[(usize, f64)]) {
    let fit = LinearFit::fit(points.iter().map(|(position, value)| (*position as f64, *value)));
    row.set(
        format!("{label}_slope"),
        fit.map(|f| round_places(f.slope, ROUND_PLACES)),
    );
    row.set(
        format!("{label}_intercept"),
        fit.map(|f| round_places(f.intercept, ROUND_PLACES)),
    );

    let values: Vec<f64> = points.iter().map(|(_, value)| *value).collect();
    let changes = ChangeCounts::from_series(&values);
    row.set(
        format!("{label}_increase_prop"),
        changes
            .increase_prop()
            .map(|prop| round_places(prop, ROUND_PLACES)),
    );
    row.set(
        format!("{label}_decrease_prop"),
        changes
            .decrease_prop()
            .map(|prop| round_places(prop, ROUND_PLACES)),
    );
}

/// Difficulty rollups for protocols that stamp a block type on every
/// block: single summaries for the easy and hard blocks, averages and
/// positional trends over the medium blocks.
#[expect(clippy::cast_precision_loss)]
fn insert_difficulty_rollups(row: &mut SummaryRow, chunks: &[ChunkSummary]) {
    let mut medium: Vec<(usize, &ChunkSummary)> = Vec::new();
    for (idx, chunk) in chunks.iter().enumerate() {
        match chunk.block_type.as_deref() {
            Some("easy") => {
                row.set("easy_accuracy", chunk.performance.accuracy);
                row.set("easy_effort", chunk.effort);
                row.set("easy_discomfort", chunk.discomfort);
            }
            Some("hard") => {
                row.set("hard_accuracy", chunk.performance.accuracy);
                row.set("hard_effort", chunk.effort);
                row.set("hard_discomfort", chunk.discomfort);
            }
            Some("medium") => medium.push((idx + 1, chunk)),
            _ => {}
        }
    }
    if medium.is_empty() {
        return;
    }

    row.set(
        "medium_accuracy",
        mean(medium.iter().map(|(_, chunk)| chunk.performance.accuracy))
            .map(|avg| round_places(avg, ROUND_PLACES)),
    );
    row.set(
        "medium_effort",
        mean(medium
            .iter()
            .filter_map(|(_, chunk)| chunk.effort.map(|value| value as f64)))
        .map(|avg| round_places(avg, ROUND_PLACES)),
    );
    row.set(
        "medium_discomfort",
        mean(medium
            .iter()
            .filter_map(|(_, chunk)| chunk.discomfort.map(|value| value as f64)))
        .map(|avg| round_places(avg, ROUND_PLACES)),
    );

    let accuracy_points: Vec<(usize, f64)> = medium
        .iter()
        .map(|(position, chunk)| (*position, chunk.performance.accuracy))
        .collect();
    insert_medium_trend(row, "accuracy", &accuracy_points);
    let effort_points: Vec<(usize, f64)> = medium
        .iter()
        .filter_map(|(position, chunk)| chunk.effort.map(|value| (*position, value as f64)))
        .collect();
    insert_medium_trend(row, "effort", &effort_points);
    let discomfort_points: Vec<(usize, f64)> = medium
        .iter()
        .filter_map(|(position, chunk)| chunk.discomfort.map(|value| (*position, value as f64)))
        .collect();
    insert_medium_trend(row, "discomfort", &discomfort_points);
}

#[expect(clippy::cast_precision_loss)]
fn insert_medium_trend(row: &mut SummaryRow, measure: &str, points: &[(usize, f64)]) {
    let fit = LinearFit::fit(points.iter().map(|(position, value)| (*position as f64, *value)));
    row.set(
        format!("medium_{measure}_slope"),
        fit.map(|f| round_places(f.slope, ROUND_PLACES)),
    );
    row.set(
        format!("medium_{measure}_intercept"),
        fit.map(|f| round_places(f.intercept, ROUND_PLACES)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        row::Value,
        trial::{SURVEY_TRIAL_TYPE, TASK_TRIAL_TYPE, stub},
    };

    fn task_trial(index: u64, stimulus: &str, rt: &str, correct: bool) -> TrialRecord {
        let mut trial = stub(index, TASK_TRIAL_TYPE);
        trial.stimulus = Some(stimulus.to_owned());
        trial.rt = Some(rt.to_owned());
        trial.correct = Some(correct);
        trial
    }

    fn survey_answer(index: u64, answer: &str) -> TrialRecord {
        let mut trial = stub(index, SURVEY_TRIAL_TYPE);
        trial.responses = Some(format!(r#"{{"Q0":"{answer}"}}"#));
        trial
    }

    fn practice_records() -> Vec<TrialRecord> {
        let mut records = vec![
            stub(0, "text"),
            stub(1, TASK_TRIAL_TYPE),
            stub(2, TASK_TRIAL_TYPE),
            stub(3, TASK_TRIAL_TYPE),
            stub(4, "text"),
            stub(5, TASK_TRIAL_TYPE),
            stub(6, TASK_TRIAL_TYPE),
            stub(7, TASK_TRIAL_TYPE),
            stub(8, "text"),
        ];
        records[0].participant_id = Some("003".to_owned());
        records[0].practice_condition = Some("num_trials".to_owned());
        records[0].time_elapsed = 500;
        records[6].time_elapsed = 7000;
        records[7].time_elapsed = 9000;
        records[8].time_elapsed = 9500;
        records[8].internal_node_id = PASSED_PRACTICE_NODE_ID.to_owned();
        records
    }

    #[test]
    fn test_compile_practice() {
        let row = compile_practice(&practice_records()).unwrap();
        assert_eq!(row.get_str("id"), Some("003"));
        assert_eq!(row.get_str("practice_condition"), Some("num_trials"));
        assert_eq!(row.get_bool("passed_practice"), Some(true));
        assert_eq!(row.get_i64("time_practice_blk1_ms"), Some(2000));
        assert_eq!(row.get_i64("time_practice_blk2_1_ms"), Some(4000));
        assert_eq!(row.get_i64("num_practice_blk2s"), Some(1));
        assert_eq!(row.get_i64("time_practice_ms"), Some(9500));
    }

    #[test]
    fn test_compile_practice_with_repeated_attempts() {
        let mut records = practice_records();
        records[8].internal_node_id = "0.0-6.0".to_owned();
        records.push(stub(9, TASK_TRIAL_TYPE));
        records.push(stub(10, TASK_TRIAL_TYPE));
        records.push(stub(11, "text"));

        let row = compile_practice(&records).unwrap();
        assert_eq!(row.get_bool("passed_practice"), Some(false));
        assert_eq!(row.get_i64("num_practice_blk2s"), Some(2));
        assert_eq!(row.get_i64("time_practice_blk2_2_ms"), Some(1000));
        assert_eq!(row.get_i64("time_practice_ms"), Some(11000));
    }

    #[test]
    fn test_compile_practice_requires_participant_id() {
        let mut records = practice_records();
        for record in &mut records {
            record.participant_id = None;
        }
        assert_eq!(
            compile_practice(&records).unwrap_err(),
            CompileError::MissingColumn {
                column: "participant_id"
            }
        );
    }

    fn experiment_records() -> Vec<TrialRecord> {
        let mut records = vec![stub(0, "text")];
        records[0].condition = Some("2".to_owned());
        for (index, answer) in [(1, "5"), (2, "4"), (3, "6"), (4, "5"), (5, "2"), (6, "4")] {
            records.push(survey_answer(index, answer));
        }
        records.push(stub(7, "text"));
        records.push(stub(8, "single-stim"));

        records.push(task_trial(9, "4", "[350]", true));
        records.push(task_trial(10, "3", "[-1]", true));
        records.push(task_trial(11, "9", "[90]", true));
        records.push(task_trial(12, "3", "[250]", false));
        records.push(survey_answer(13, "4<br>Somewhat hard"));
        records.push(survey_answer(14, "5<br>Moderately"));
        records.push(stub(15, "text"));

        records.push(task_trial(16, "6", "[400]", true));
        records.push(task_trial(17, "8", "[500]", true));
        records.push(task_trial(18, "3", "[150]", false));
        records.push(task_trial(19, "2", "[-1]", false));
        records.push(survey_answer(20, "6<br>Hard"));
        records.push(survey_answer(21, "2<br>Slightly"));

        let mut end = stub(22, "text");
        end.time_elapsed = 400_000;
        records.push(end);
        records
    }

    #[test]
    fn test_compile_experiment_structure() {
        let row = compile_experiment(&experiment_records()).unwrap();

        assert_eq!(row.get_str("condition"), Some("2"));
        assert_eq!(row.get_i64("num_blocks"), Some(2));
        assert_eq!(row.get_i64("num_trials"), Some(8));
        assert_eq!(row.get_i64("trials_per_block"), Some(4));
        assert_eq!(row.get_i64("time_experiment_ms"), Some(400_000));

        assert_eq!(row.get_i64("anticipated_enjoyment"), Some(5));
        assert_eq!(row.get_i64("anticipated_performance"), Some(4));
        assert_eq!(row.get_i64("anticipated_effort"), Some(6));
        assert_eq!(row.get_i64("anticipated_discomfort"), Some(5));
        assert_eq!(row.get_i64("anticipated_fatigue"), Some(2));
        assert_eq!(row.get_i64("anticipated_motivation"), Some(4));

        // Every block contributes the same twelve keys.
        for prefix in ["blk1_", "blk2_"] {
            let count = row.keys().filter(|key| key.starts_with(prefix)).count();
            assert_eq!(count, 12, "prefix {prefix}");
        }
    }

    #[test]
    fn test_compile_experiment_block_summaries() {
        let row = compile_experiment(&experiment_records()).unwrap();

        assert_eq!(row.get_f64("blk1_rt_avg"), Some(230.0));
        assert_eq!(row.get_f64("blk1_anticipated"), Some(0.25));
        assert_eq!(row.get_f64("blk1_accuracy"), Some(0.5));
        assert_eq!(row.get_f64("blk1_nogo_errors"), Some(0.25));
        assert_eq!(row.get_f64("blk1_nogo_prev4_avg"), Some(220.0));
        assert_eq!(row.get_i64("blk1_num_prev4_rts"), Some(2));
        assert_eq!(row.get("blk1_nogo_next4_avg"), Some(&Value::Null));
        assert_eq!(row.get_i64("blk1_effort"), Some(4));
        assert_eq!(row.get_i64("blk1_discomfort"), Some(5));

        assert_eq!(row.get_f64("blk2_rt_avg"), Some(350.0));
        assert_eq!(row.get_f64("blk2_go_errors"), Some(0.25));
        assert_eq!(row.get_f64("blk2_nogo_prev4_avg"), Some(450.0));
        assert_eq!(row.get_i64("blk2_effort"), Some(6));
        assert_eq!(row.get_i64("blk2_discomfort"), Some(2));
    }

    #[test]
    fn test_compile_experiment_aggregates() {
        let row = compile_experiment(&experiment_records()).unwrap();

        // (220 * 2 + 450 * 2) / 4
        assert_eq!(row.get_f64("nogo_error_prev_rt_avg"), Some(335.0));
        assert_eq!(row.get("nogo_error_next_rt_avg"), Some(&Value::Null));

        assert_eq!(row.get_i64("start_effort"), Some(4));
        assert_eq!(row.get_i64("peak_effort"), Some(6));
        assert_eq!(row.get_i64("end_effort"), Some(6));
        assert_eq!(row.get_f64("avg_effort"), Some(5.0));

        assert_eq!(row.get_i64("start_discomfort"), Some(5));
        assert_eq!(row.get_i64("peak_discomfort"), Some(5));
        assert_eq!(row.get_i64("end_discomfort"), Some(2));
        assert_eq!(row.get_f64("avg_discomfort"), Some(3.5));

        assert_eq!(row.get_f64("avg_accuracy"), Some(0.5));
        assert_eq!(row.get_f64("max_accuracy"), Some(0.5));
        assert_eq!(row.get_f64("min_accuracy"), Some(0.5));
        assert_eq!(row.get_f64("start_accuracy"), Some(0.5));
        assert_eq!(row.get_f64("end_accuracy"), Some(0.5));

        assert_eq!(row.get_f64("accuracy_slope"), Some(0.0));
        assert_eq!(row.get_f64("accuracy_intercept"), Some(0.5));
        assert_eq!(row.get_f64("effort_slope"), Some(2.0));
        assert_eq!(row.get_f64("effort_intercept"), Some(2.0));
        assert_eq!(row.get_f64("discomfort_slope"), Some(-3.0));
        assert_eq!(row.get_f64("discomfort_intercept"), Some(8.0));

        assert_eq!(row.get_f64("effort_increase_prop"), Some(1.0));
        assert_eq!(row.get_f64("effort_decrease_prop"), Some(0.0));
        assert_eq!(row.get_f64("discomfort_decrease_prop"), Some(1.0));
        assert_eq!(row.get_f64("accuracy_increase_prop"), Some(0.0));

        assert_eq!(row.get_f64("auc_accuracy"), Some(0.5));
        assert_eq!(row.get_f64("auc_effort"), Some(5.0));
        assert_eq!(row.get_f64("auc_discomfort"), Some(3.5));

        // Untyped blocks produce no difficulty rollups.
        assert_eq!(row.get("medium_accuracy"), None);
        assert_eq!(row.get("easy_accuracy"), None);
    }

    fn typed_block(
        records: &mut Vec<TrialRecord>,
        index: &mut u64,
        block_type: &str,
        correct: [bool; 2],
        effort: &str,
        discomfort: &str,
    ) {
        for trial_correct in correct {
            let mut trial = task_trial(*index, "7", "[400]", trial_correct);
            trial.block_type = Some(block_type.to_owned());
            records.push(trial);
            *index += 1;
        }
        records.push(survey_answer(*index, effort));
        *index += 1;
        records.push(survey_answer(*index, discomfort));
        *index += 1;
        records.push(stub(*index, "text"));
        *index += 1;
    }

    #[test]
    fn test_compile_experiment_difficulty_rollups() {
        let mut records = vec![stub(0, "text")];
        let mut index = 1;
        typed_block(&mut records, &mut index, "medium", [true, true], "3", "2");
        typed_block(&mut records, &mut index, "easy", [true, false], "2", "1");
        typed_block(&mut records, &mut index, "medium", [false, true], "5", "4");
        typed_block(&mut records, &mut index, "hard", [true, true], "7", "6");

        let row = compile_experiment(&records).unwrap();

        assert_eq!(row.get_str("blk1_block_type"), Some("medium"));
        assert_eq!(row.get_f64("easy_accuracy"), Some(0.5));
        assert_eq!(row.get_i64("easy_effort"), Some(2));
        assert_eq!(row.get_i64("easy_discomfort"), Some(1));
        assert_eq!(row.get_f64("hard_accuracy"), Some(1.0));
        assert_eq!(row.get_i64("hard_effort"), Some(7));
        assert_eq!(row.get_i64("hard_discomfort"), Some(6));

        assert_eq!(row.get_f64("medium_accuracy"), Some(0.75));
        assert_eq!(row.get_f64("medium_effort"), Some(4.0));
        assert_eq!(row.get_f64("medium_discomfort"), Some(3.0));

        // Medium blocks sit at positions 1 and 3.
        assert_eq!(row.get_f64("medium_accuracy_slope"), Some(-0.25));
        assert_eq!(row.get_f64("medium_accuracy_intercept"), Some(1.25));
        assert_eq!(row.get_f64("medium_effort_slope"), Some(1.0));
        assert_eq!(row.get_f64("medium_effort_intercept"), Some(2.0));
        assert_eq!(row.get_f64("medium_discomfort_slope"), Some(1.0));
        assert_eq!(row.get_f64("medium_discomfort_intercept"), Some(1.0));
    }

    #[test]
    fn test_compile_experiment_without_blocks() {
        let records = vec![stub(0, "text"), stub(1, "single-stim")];
        assert_eq!(
            compile_experiment(&records).unwrap_err(),
            CompileError::NoBlocks
        );
        assert_eq!(
            compile_experiment(&[]).unwrap_err(),
            CompileError::EmptyRecords
        );
    }

    fn follow_up_records() -> Vec<TrialRecord> {
        let mut age = survey_answer(1, "22");
        age.internal_node_id = "0.0-1.0-0.0".to_owned();
        let mut sex = survey_answer(2, "Female");
        sex.internal_node_id = "0.0-2.0-0.0".to_owned();
        let mut behav = survey_answer(3, "2<br>Often");
        behav.internal_node_id = "0.0-11.0-2.0".to_owned();
        let mut behav_na = survey_answer(4, "N/A");
        behav_na.internal_node_id = "0.0-11.0-0.0".to_owned();
        let mut retro = survey_answer(5, "4<br>Somewhat hard");
        retro.internal_node_id = "0.0-13.0-0.0".to_owned();

        let mut delay = stub(PWMT_DELAY_TRIAL_INDEX, "text");
        delay.time_elapsed = 196_373;
        let mut end = stub(50, "text");
        end.time_elapsed = 220_848;

        vec![stub(0, "text"), age, sex, behav, behav_na, retro, delay, end]
    }

    #[test]
    fn test_compile_follow_up() {
        let row = compile_follow_up(&follow_up_records(), true).unwrap();
        assert_eq!(row.get_str("age"), Some("22"));
        assert_eq!(row.get_str("sex"), Some("Female"));
        assert_eq!(row.get_str("behav_survey_3"), Some("2"));
        assert_eq!(row.get_str("behav_survey_1"), Some("N/A"));
        assert_eq!(row.get_str("pwmt_effort"), Some("4"));
        // Unanswered questions stay as empty cells.
        assert_eq!(row.get("dob"), Some(&Value::Null));
        assert_eq!(row.get_i64("time_pwmt_delay_ms"), Some(196_373));
        assert_eq!(row.get_i64("time_follow_up_ms"), Some(220_848));
    }

    #[test]
    fn test_compile_follow_up_without_retrospective() {
        let row = compile_follow_up(&follow_up_records(), false).unwrap();
        assert_eq!(row.get("pwmt_effort"), None);
        assert_eq!(row.get_str("age"), Some("22"));
    }

    #[test]
    fn test_compile_follow_up_without_delay_screen() {
        let mut records = follow_up_records();
        records.retain(|t| t.trial_index != PWMT_DELAY_TRIAL_INDEX);
        let row = compile_follow_up(&records, true).unwrap();
        assert_eq!(row.get("time_pwmt_delay_ms"), None);
    }
}
