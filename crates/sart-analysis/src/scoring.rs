//! Per-trial outcome classification.
//!
//! Every task trial lands in exactly one outcome. Anticipations are judged
//! first and override the recorded correctness flag: a response faster than
//! the threshold cannot have been driven by the stimulus, however it was
//! keyed.

use serde::Serialize;

use crate::trial::{PayloadError, TrialRecord};

/// Stimulus on which the response must be withheld.
pub const NO_GO_STIMULUS: &str = "3";

/// Responses faster than this many milliseconds are anticipations.
pub const ANTICIPATION_THRESHOLD_MS: f64 = 100.0;

/// Outcome of a single go/no-go task trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialOutcome {
    /// Responded as the stimulus demanded.
    Correct,
    /// Responded faster than [`ANTICIPATION_THRESHOLD_MS`].
    AnticipationError,
    /// Failed to respond (or misresponded) to a go stimulus.
    GoError,
    /// Responded to the no-go stimulus.
    NoGoError,
    /// Incorrect, but the stimulus carries no digit to judge against.
    Unscored,
}

impl TrialOutcome {
    /// Classifies one task trial.
    pub fn classify(trial: &TrialRecord) -> Result<Self, PayloadError> {
        let response_times = trial.response_times()?;
        if response_times
            .first()
            .is_some_and(|rt| *rt < ANTICIPATION_THRESHOLD_MS)
        {
            return Ok(Self::AnticipationError);
        }
        if trial.correct.unwrap_or(false) {
            return Ok(Self::Correct);
        }
        match trial.stimulus.as_deref().map(str::trim) {
            Some(stimulus) if !stimulus.is_empty() && is_all_digits(stimulus) => {
                if stimulus == NO_GO_STIMULUS {
                    Ok(Self::NoGoError)
                } else {
                    Ok(Self::GoError)
                }
            }
            _ => Ok(Self::Unscored),
        }
    }
}

fn is_all_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}
