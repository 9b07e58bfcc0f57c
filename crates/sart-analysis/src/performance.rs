//! Block-level performance summaries.

use derive_more::{Display, Error, From};
use serde::Serialize;

use sart_stats::{descriptive::mean, round::round_places};

use crate::{
    ROUND_PLACES,
    block::TrialBlock,
    scoring::TrialOutcome,
    survey,
    trial::{PayloadError, TrialRecord},
};

/// Trials pooled on each side of a no-go error for the reaction-time
/// windows.
pub const RT_WINDOW: usize = 4;

/// Performance aggregates over one block's task trials.
///
/// Error shares and accuracy are proportions of `num_trials`; reaction-time
/// averages are `None` when no trial in the pool carried a response. All
/// floats are rounded to [`ROUND_PLACES`] decimal places.
#[derive(Debug, Clone, Serialize)]
pub struct BlockPerformance {
    pub num_trials: usize,
    pub rt_avg: Option<f64>,
    pub anticipated: f64,
    pub accuracy: f64,
    pub go_errors: f64,
    pub nogo_errors: f64,
    /// Mean reaction time over the trials preceding each no-go error.
    pub nogo_prev4_avg: Option<f64>,
    pub num_prev4_rts: usize,
    /// Mean reaction time over the trials following each no-go error.
    pub nogo_next4_avg: Option<f64>,
    pub num_next4_rts: usize,
}

impl BlockPerformance {
    /// Scores a block's task trials.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_trials(trials: &[&TrialRecord]) -> Result<Self, ScoreError> {
        if trials.is_empty() {
            return Err(ScoreError::EmptyBlock);
        }
        let num_trials = trials.len();

        let mut outcomes = Vec::with_capacity(num_trials);
        let mut trial_rts = Vec::with_capacity(num_trials);
        for trial in trials {
            outcomes.push(TrialOutcome::classify(trial)?);
            trial_rts.push(trial.response_times()?);
        }

        let rt_avg = rounded_mean(trial_rts.iter().flatten().copied());

        let count =
            |target: TrialOutcome| outcomes.iter().filter(|outcome| **outcome == target).count();
        let share = |n: usize| round_places(n as f64 / num_trials as f64, ROUND_PLACES);

        let windows = nogo_rt_windows(&outcomes, &trial_rts);

        Ok(Self {
            num_trials,
            rt_avg,
            anticipated: share(count(TrialOutcome::AnticipationError)),
            accuracy: share(count(TrialOutcome::Correct)),
            go_errors: share(count(TrialOutcome::GoError)),
            nogo_errors: share(count(TrialOutcome::NoGoError)),
            nogo_prev4_avg: windows.prev_avg,
            num_prev4_rts: windows.prev_count,
            nogo_next4_avg: windows.next_avg,
            num_next4_rts: windows.next_count,
        })
    }
}

/// Summary of one experimental chunk: the block's task performance plus its
/// post-block survey ratings.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkSummary {
    #[serde(flatten)]
    pub performance: BlockPerformance,
    /// Rating from the first post-block question.
    pub effort: Option<i64>,
    /// Rating from the second post-block question.
    pub discomfort: Option<i64>,
    pub block_type: Option<String>,
}

impl ChunkSummary {
    /// Scores a block extracted with its survey trials.
    pub fn from_block(block: &TrialBlock<'_>) -> Result<Self, ScoreError> {
        let task_trials = block.task_trials();
        let performance = BlockPerformance::from_trials(&task_trials)?;

        let survey_trials = block.survey_trials();
        let effort = survey_trials.first().and_then(|t| survey::likert_rating(t));
        let discomfort = survey_trials.get(1).and_then(|t| survey::likert_rating(t));

        let block_type = task_trials.iter().find_map(|t| t.block_type.clone());

        Ok(Self {
            performance,
            effort,
            discomfort,
            block_type,
        })
    }
}

/// A block that cannot be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum ScoreError {
    #[display("block contains no task trials")]
    EmptyBlock,
    #[display("{_0}")]
    #[from]
    Payload(PayloadError),
}

struct RtWindows {
    prev_avg: Option<f64>,
    prev_count: usize,
    next_avg: Option<f64>,
    next_count: usize,
}

/// Pools the reaction times of up to [`RT_WINDOW`] trials on each side of
/// every no-go error, clamped at the block edges.
fn nogo_rt_windows(outcomes: &[TrialOutcome], trial_rts: &[Vec<f64>]) -> RtWindows {
    let mut prev = Vec::new();
    let mut next = Vec::new();
    for (idx, outcome) in outcomes.iter().enumerate() {
        if *outcome != TrialOutcome::NoGoError {
            continue;
        }
        prev.extend(trial_rts[idx.saturating_sub(RT_WINDOW)..idx].iter().flatten());
        let end = (idx + 1 + RT_WINDOW).min(trial_rts.len());
        next.extend(trial_rts[idx + 1..end].iter().flatten());
    }
    RtWindows {
        prev_avg: rounded_mean(prev.iter().copied()),
        prev_count: prev.len(),
        next_avg: rounded_mean(next.iter().copied()),
        next_count: next.len(),
    }
}

fn rounded_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    mean(values).map(|avg| round_places(avg, ROUND_PLACES))
}
