//! CSV export of compiled participant rows.
//!
//! Participants differ in which columns they produce, so the main table is
//! written over the union of keys: `id` pinned first, the rest in
//! alphabetical order, absent cells empty. The alternative analysis table
//! restricts the columns to the per-block accuracy and rating series and
//! orders participants by block count.

use std::collections::BTreeSet;

use anyhow::Context;
use sart_analysis::row::SummaryRow;

use crate::util::Output;

/// Per-block measures carried into the alternative analysis table.
const ALT_BLOCK_MEASURES: &[&str] = &["accuracy", "discomfort", "effort"];
/// Highest block position covered by the alternative analysis table.
const ALT_MAX_BLOCKS: usize = 9;

/// Writes the aggregate summary table over the union of row keys.
pub fn write_summary_csv(rows: &[SummaryRow], output: Output) -> anyhow::Result<()> {
    let columns = summary_columns(rows);
    write_csv(rows.iter(), &columns, output)
}

/// Writes the alternative analysis table: block series columns only, rows
/// ordered by block count.
pub fn write_alt_csv(rows: &[SummaryRow], output: Output) -> anyhow::Result<()> {
    let mut columns = vec!["id".to_owned(), "num_blocks".to_owned()];
    let mut block_columns = Vec::new();
    for position in 1..=ALT_MAX_BLOCKS {
        for measure in ALT_BLOCK_MEASURES {
            block_columns.push(format!("blk{position}_{measure}"));
        }
    }
    block_columns.sort();
    columns.extend(block_columns);

    let mut sorted: Vec<&SummaryRow> = rows.iter().collect();
    sorted.sort_by_key(|row| row.get_i64("num_blocks").unwrap_or(0));

    write_csv(sorted.into_iter(), &columns, output)
}

fn summary_columns(rows: &[SummaryRow]) -> Vec<String> {
    let mut keys = BTreeSet::new();
    for row in rows {
        for key in row.keys() {
            if key != "id" {
                keys.insert(key.to_owned());
            }
        }
    }
    let mut columns = vec!["id".to_owned()];
    columns.extend(keys);
    columns
}

fn write_csv<'a, I>(rows: I, columns: &[String], output: Output) -> anyhow::Result<()>
where
    I: Iterator<Item = &'a SummaryRow>,
{
    let path_label = output.display_path();
    let mut writer = csv::Writer::from_writer(output);
    writer
        .write_record(columns)
        .with_context(|| format!("failed to write header to {path_label}"))?;
    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| {
                row.get(column)
                    .map(|value| value.to_string())
                    .unwrap_or_default()
            })
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("failed to write row to {path_label}"))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {path_label}"))?;
    Ok(())
}
