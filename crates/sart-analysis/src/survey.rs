//! Survey-response decoding and the protocol's question tables.
//!
//! Survey answers arrive as a JSON object per row, keyed `Q0`, `Q1`, ...
//! Likert answers embed their scale value as the leading digit of the
//! answer text (e.g. `"3<br>Moderately"`). Questions outside the task
//! blocks are identified by the timeline node id the runner assigned them;
//! the tables below pin each exported column to its node id.

use crate::trial::TrialRecord;

/// Node id reached only when the second practice block is passed.
pub const PASSED_PRACTICE_NODE_ID: &str = "0.0-7.0-0.0";

/// Decodes a survey `responses` payload and returns the answer to question
/// `question_number`, trimmed.
///
/// Returns `None` for malformed payloads or absent questions.
#[must_use]
pub fn response_from_json(payload: &str, question_number: usize) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(payload).ok()?;
    let key = format!("Q{question_number}");
    let answer = parsed.get(key.as_str())?.as_str()?;
    Some(answer.trim().to_owned())
}

/// Answer of the first record carrying the given timeline node id.
///
/// With `likert`, an answer starting with a digit is reduced to that
/// leading digit.
#[must_use]
pub fn response_for_node(records: &[TrialRecord], node_id: &str, likert: bool) -> Option<String> {
    let trial = records.iter().find(|t| t.internal_node_id == node_id)?;
    let response = response_from_json(trial.responses.as_deref()?, 0)?;
    if likert {
        if let Some(first) = response.chars().next() {
            if first.is_ascii_digit() {
                return Some(first.to_string());
            }
        }
    }
    Some(response)
}

/// Scale value of a likert survey trial: the leading digit of its `Q0`
/// answer.
#[must_use]
pub fn likert_rating(trial: &TrialRecord) -> Option<i64> {
    let response = response_from_json(trial.responses.as_deref()?, 0)?;
    let first = response.chars().next()?;
    first.to_digit(10).map(i64::from)
}

/// Pre-task expectation questions, read positionally from the head of the
/// experiment file.
pub const ANTICIPATED_QUESTION_FIELDS: &[(&str, u64)] = &[
    ("anticipated_enjoyment", 1),
    ("anticipated_performance", 2),
    ("anticipated_effort", 3),
    ("anticipated_discomfort", 4),
    ("anticipated_fatigue", 5),
    ("anticipated_motivation", 6),
];

/// Demographics and electronics-use questions of the follow-up stage.
pub const DEMOGRAPHICS_NODE_FIELDS: &[(&str, &str)] = &[
    ("age", "0.0-1.0-0.0"),
    ("dob", "0.0-1.0-1.0"),
    ("sex", "0.0-2.0-0.0"),
    ("edu_year", "0.0-2.0-1.0"),
    ("edu_plan", "0.0-2.0-2.0"),
    ("eng_first_lang", "0.0-2.0-3.0"),
    ("eng_years", "0.0-2.0-4.0"),
    ("mother_edu", "0.0-2.0-5.0"),
    ("mother_job", "0.0-3.0"),
    ("father_edu", "0.0-4.0-0.0"),
    ("father_job", "0.0-5.0-0.0"),
    ("high_school_avg", "0.0-5.0-1.0"),
    ("uni_avg", "0.0-5.0-2.0"),
    ("num_uni_stats", "0.0-6.0-0.0"),
    ("num_hs_stats", "0.0-6.0-1.0"),
    ("num_hs_math", "0.0-6.0-2.0"),
    ("num_uni_math", "0.0-6.0-3.0"),
    ("math_enjoy", "0.0-6.0-4.0"),
    ("adhd_diag", "0.0-6.0-5.0"),
    ("uni_major", "0.0-7.0"),
    ("elect_survey_1", "0.0-8.0-0.0"),
    ("elect_survey_2", "0.0-8.0-1.0"),
    ("elect_survey_3", "0.0-8.0-2.0"),
    ("elect_survey_4", "0.0-8.0-3.0"),
    ("elect_survey_5", "0.0-8.0-4.0"),
    ("elect_survey_6", "0.0-8.0-5.0"),
    ("elect_survey_7", "0.0-9.0"),
];

/// Behavioural survey of the follow-up stage; all answers are likert.
pub const BEHAVIOURAL_NODE_FIELDS: &[(&str, &str)] = &[
    ("behav_survey_1", "0.0-11.0-0.0"),
    ("behav_survey_2", "0.0-11.0-1.0"),
    ("behav_survey_3", "0.0-11.0-2.0"),
    ("behav_survey_4", "0.0-11.0-3.0"),
    ("behav_survey_5", "0.0-11.0-4.0"),
    ("behav_survey_6", "0.0-11.0-5.0"),
    ("behav_survey_7", "0.0-11.0-6.0"),
    ("behav_survey_8", "0.0-11.0-7.0"),
    ("behav_survey_9", "0.0-11.0-8.0"),
    ("behav_survey_10", "0.0-11.0-9.0"),
    ("behav_survey_11", "0.0-11.0-10.0"),
    ("behav_survey_12", "0.0-11.0-11.0"),
    ("behav_survey_13", "0.0-11.0-12.0"),
    ("behav_survey_14", "0.0-11.0-13.0"),
    ("behav_survey_15", "0.0-11.0-14.0"),
    ("behav_survey_16", "0.0-11.0-15.0"),
    ("behav_survey_17", "0.0-11.0-16.0"),
    ("behav_survey_18", "0.0-11.0-17.0"),
];

/// Retrospective task-experience questions, asked only of participants who
/// passed practice; all answers are likert.
pub const RETROSPECTIVE_NODE_FIELDS: &[(&str, &str)] = &[
    ("pwmt_effort", "0.0-13.0-0.0"),
    ("pwmt_discomfort", "0.0-13.0-1.0"),
    ("pwmt_performance", "0.0-13.0-2.0"),
    ("pwmt_willingtodowmt", "0.0-13.0-3.0"),
    ("pwmt_fatigue", "0.0-13.0-4.0"),
    ("pwmt_satisfaction", "0.0-13.0-5.0"),
    ("pwmt_didmybest", "0.0-13.0-6.0"),
    ("pwmt_enjoyment", "0.0-13.0-7.0"),
];
