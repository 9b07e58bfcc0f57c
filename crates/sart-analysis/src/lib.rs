//! Offline analysis of sustained-attention-to-response-task (SART) exports.
//!
//! A SART session is exported as one CSV per participant and stage, holding
//! a flat, chronologically-ordered table of heterogeneous trial rows:
//! instruction screens, fixation crosses, go/no-go task trials, and survey
//! questions. This crate turns those tables into per-participant summary
//! rows.
//!
//! # Pipeline
//!
//! 1. **Load rows** ([`trial::TrialRecord`]): one record per CSV row,
//!    payload columns (reaction times, survey responses) kept as raw JSON
//!    and decoded on demand
//! 2. **Segment blocks** ([`block::extract_sart_blocks`]): find the
//!    contiguous runs of task trials (optionally with their post-block
//!    survey questions) that make up one experimental block
//! 3. **Score trials** ([`scoring::TrialOutcome`]): classify every task
//!    trial as correct, anticipation error, go error, or no-go error under
//!    the task's fixed thresholds
//! 4. **Summarize blocks** ([`performance::BlockPerformance`],
//!    [`performance::ChunkSummary`]): accuracy, reaction-time aggregates,
//!    and the reaction-time windows around no-go errors
//! 5. **Compile participants** ([`participant`]): merge practice,
//!    experiment, and follow-up stages into one [`row::SummaryRow`] of
//!    named, typed cells ready for CSV export
//!
//! Survey questions are identified by the fixed timeline node ids the
//! experiment runner assigns; the known id tables live in [`survey`].

pub mod block;
pub mod participant;
pub mod performance;
pub mod row;
pub mod scoring;
pub mod survey;
pub mod trial;

/// Decimal places kept by every rounded value in exported summaries.
pub const ROUND_PLACES: u32 = 9;
