//! Block segmentation over a flat trial table.
//!
//! A session export interleaves task blocks with instruction screens,
//! fixation crosses, and surveys. A block is a maximal contiguous run of
//! accepted trial types; everything else acts as a separator. Two details
//! make the scan more than a plain split:
//!
//! - survey rows may only *extend* a block, never open one, so the
//!   pre-task survey battery at the top of a session never forms a block;
//! - when survey rows are accepted, a block is capped at
//!   `max_survey_trials` of them (the protocol asks exactly two questions
//!   after each block). Once the cap is reached the block is closed by the
//!   next row, and a task row that does the closing starts the next block
//!   itself, which keeps back-to-back blocks apart even when the separator
//!   row is missing from the export.

use crate::trial::{SURVEY_TRIAL_TYPE, TASK_TRIAL_TYPE, TrialRecord};

/// Survey questions asked after each experimental block.
pub const MAX_SURVEY_TRIALS_PER_BLOCK: usize = 2;

/// A contiguous run of trials forming one experimental block.
///
/// Blocks borrow from the scanned slice and always hold at least one trial.
#[derive(Debug, Clone, Copy)]
pub struct TrialBlock<'a> {
    trials: &'a [TrialRecord],
}

impl<'a> TrialBlock<'a> {
    fn new(trials: &'a [TrialRecord]) -> Self {
        debug_assert!(!trials.is_empty(), "blocks always hold at least one trial");
        Self { trials }
    }

    #[must_use]
    pub fn trials(&self) -> &'a [TrialRecord] {
        self.trials
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// The block's go/no-go task trials, in document order.
    #[must_use]
    pub fn task_trials(&self) -> Vec<&'a TrialRecord> {
        self.trials.iter().filter(|t| t.is_task_trial()).collect()
    }

    /// The block's survey trials, in document order.
    #[must_use]
    pub fn survey_trials(&self) -> Vec<&'a TrialRecord> {
        self.trials.iter().filter(|t| t.is_survey_trial()).collect()
    }

    /// Wall-clock time spanned by the block, from its first to its last
    /// trial.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        let first = self
            .trials
            .first()
            .expect("blocks always hold at least one trial");
        let last = self
            .trials
            .last()
            .expect("blocks always hold at least one trial");
        last.time_elapsed - first.time_elapsed
    }
}

/// Extracts the contiguous blocks of `trial_types` rows from `records`.
///
/// Rows of other types separate blocks. Survey rows never open a block, and
/// at most `max_survey_trials` of them are accepted per block; a block that
/// has reached the cap is closed by the next row regardless of its type.
#[must_use]
pub fn extract_blocks<'a>(
    records: &'a [TrialRecord],
    trial_types: &[&str],
    max_survey_trials: usize,
) -> Vec<TrialBlock<'a>> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut survey_count = 0_usize;

    for (idx, record) in records.iter().enumerate() {
        let in_types = trial_types.contains(&record.trial_type.as_str());
        let is_survey = record.is_survey_trial();
        let saturated = max_survey_trials > 0 && survey_count >= max_survey_trials;
        let extends = in_types && !saturated && (!is_survey || survey_count < max_survey_trials);

        if extends {
            if start.is_none() {
                if is_survey {
                    // Surveys between blocks belong to no block.
                    continue;
                }
                start = Some(idx);
            }
            if is_survey {
                survey_count += 1;
            }
            continue;
        }

        if let Some(block_start) = start.take() {
            blocks.push(TrialBlock::new(&records[block_start..idx]));
            survey_count = 0;
            if in_types && !is_survey {
                // A task row closing a saturated block is the first trial
                // of the next one.
                start = Some(idx);
            }
        }
    }

    if let Some(block_start) = start {
        blocks.push(TrialBlock::new(&records[block_start..]));
    }

    blocks
}

/// Extracts SART blocks: runs of task trials, optionally with the two
/// post-block survey questions.
#[must_use]
pub fn extract_sart_blocks(records: &[TrialRecord], with_survey: bool) -> Vec<TrialBlock<'_>> {
    if with_survey {
        extract_blocks(
            records,
            &[TASK_TRIAL_TYPE, SURVEY_TRIAL_TYPE],
            MAX_SURVEY_TRIALS_PER_BLOCK,
        )
    } else {
        extract_blocks(records, &[TASK_TRIAL_TYPE], MAX_SURVEY_TRIALS_PER_BLOCK)
    }
}
