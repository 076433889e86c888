//! Tabular run export.

use std::io::Write;

use crate::services::file_ops::RenameOutcome;
use crate::services::matcher::RunReport;
use crate::services::report::RenamePlan;
use crate::types::errors::{MatchError, MatchResult};

pub const CSV_HEADER: [&str; 6] = [
    "index",
    "prompt",
    "status",
    "original_name",
    "new_name",
    "score",
];

/// One row per prompt, then one per unused file.
///
/// `outcomes` lines up with `plan.entries`; pass an empty slice when nothing
/// was applied.
pub fn write_csv<W: Write>(
    writer: W,
    report: &RunReport,
    plan: &RenamePlan,
    outcomes: &[RenameOutcome],
) -> MatchResult<()> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    w.write_record(CSV_HEADER)?;

    for (position, record) in report.matches.iter().enumerate() {
        let entry = plan
            .entries
            .iter()
            .find(|entry| entry.sequence_index == record.prompt_sequence_index);
        let failure = outcomes.get(position).and_then(RenameOutcome::failure);

        let status = match (&record.matched_file, failure) {
            (Some(_), Some(cause)) => format!("rename failed: {cause}"),
            (Some(_), None) => "matched".to_string(),
            (None, _) => "missing".to_string(),
        };
        let original = record
            .matched_file
            .as_ref()
            .map(|file| file.original_name.as_str())
            .unwrap_or_default();
        let new_name = match (&record.matched_file, entry) {
            (Some(_), Some(entry)) => entry.target_name.as_str(),
            _ => "",
        };
        let score = record
            .score
            .map(|score| format!("{score:.3}"))
            .unwrap_or_default();

        w.write_record([
            plan.padded(record.prompt_sequence_index).as_str(),
            record.prompt_text.as_str(),
            status.as_str(),
            original,
            new_name,
            score.as_str(),
        ])?;
    }

    for file in &report.unused_files {
        let status = if report.excluded_files.contains(&file.original_name) {
            "excluded"
        } else {
            "unused"
        };
        w.write_record(["", "", status, file.original_name.as_str(), "", ""])?;
    }

    w.flush()
        .map_err(|e| MatchError::Export(format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/csv_export_tests.rs"]
mod tests;
