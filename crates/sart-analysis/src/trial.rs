//! Trial records as exported by the experiment runner.
//!
//! Each CSV row is one timeline entry of the jsPsych session: instruction
//! screens, fixation crosses, task trials, and survey questions all share
//! the same columns. Stage-specific columns (`practice_condition`,
//! `condition`, `block_order`) only appear in the export of that stage and
//! deserialize to `None` elsewhere.

use derive_more::{Display, Error};
use serde::{Deserialize, Deserializer, Serialize};

/// Trial type of a go/no-go task trial.
pub const TASK_TRIAL_TYPE: &str = "multi-stim-multi-response";
/// Trial type of a multiple-choice survey question.
pub const SURVEY_TRIAL_TYPE: &str = "survey-multi-choice";

/// One row of a per-participant CSV export, in document order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrialRecord {
    /// Position of the row within the session.
    pub trial_index: u64,
    /// jsPsych plugin name, e.g. `multi-stim-multi-response` or `text`.
    pub trial_type: String,
    /// Displayed stimulus; a digit string on task trials.
    #[serde(default)]
    pub stimulus: Option<String>,
    /// Recorded correctness flag. Anticipation errors override it later.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub correct: Option<bool>,
    /// Raw reaction-time payload: a JSON array of milliseconds, `-1`
    /// marking a withheld response, e.g. `"[667]"`.
    #[serde(default)]
    pub rt: Option<String>,
    /// Timeline node id assigned by the runner, e.g. `0.0-7.0-0.0`.
    pub internal_node_id: String,
    /// Raw survey-response payload: a JSON object keyed by question,
    /// e.g. `{"Q0":"3<br>Moderately"}`.
    #[serde(default)]
    pub responses: Option<String>,
    /// Milliseconds elapsed since the session started.
    pub time_elapsed: i64,
    #[serde(default)]
    pub participant_id: Option<String>,
    #[serde(default)]
    pub practice_condition: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    /// Comma-joined difficulty order, stamped on experiment rows.
    #[serde(default)]
    pub block_order: Option<String>,
    /// Difficulty of the enclosing block, stamped on task rows when the
    /// protocol assigns one.
    #[serde(default)]
    pub block_type: Option<String>,
}

impl TrialRecord {
    #[must_use]
    pub fn is_task_trial(&self) -> bool {
        self.trial_type == TASK_TRIAL_TYPE
    }

    #[must_use]
    pub fn is_survey_trial(&self) -> bool {
        self.trial_type == SURVEY_TRIAL_TYPE
    }

    /// Decodes the reaction-time payload and drops withheld responses
    /// (negative entries).
    ///
    /// A missing or empty payload yields no reaction times; a payload that
    /// is not a JSON number array is an error.
    pub fn response_times(&self) -> Result<Vec<f64>, PayloadError> {
        let Some(raw) = self.rt.as_deref().map(str::trim) else {
            return Ok(Vec::new());
        };
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let values: Vec<f64> =
            serde_json::from_str(raw).map_err(|_| PayloadError::MalformedReactionTimes {
                trial_index: self.trial_index,
            })?;
        Ok(values.into_iter().filter(|rt| *rt >= 0.0).collect())
    }
}

/// A raw payload column that could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PayloadError {
    #[display("trial {trial_index}: reaction-time payload is not a JSON number array")]
    MalformedReactionTimes { trial_index: u64 },
}

/// Accepts `true`/`false` in any case as well as `1`/`0`; empty cells and
/// absent columns are `None`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("true") || s == "1" => Ok(Some(true)),
        Some(s) if s.eq_ignore_ascii_case("false") || s == "0" => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid boolean value: {other}"
        ))),
    }
}

#[cfg(test)]
pub(crate) fn stub(trial_index: u64, trial_type: &str) -> TrialRecord {
    TrialRecord {
        trial_index,
        trial_type: trial_type.to_owned(),
        stimulus: None,
        correct: None,
        rt: None,
        internal_node_id: format!("0.0-{trial_index}.0"),
        responses: None,
        time_elapsed: i64::try_from(trial_index).unwrap() * 1000,
        participant_id: None,
        practice_condition: None,
        condition: None,
        block_order: None,
        block_type: None,
    }
}
