use std::fmt::Write;

use crate::services::matcher::RunReport;
use crate::services::report::RenamePlan;

/// Human-readable run log: one line per prompt, then unused files.
///
/// `001 -> user1_a_cat_abc12345.png (score=1.000, strategy=containment)`
pub fn render_text_log(report: &RunReport, plan: &RenamePlan) -> String {
    let mut out = String::new();

    for record in &report.matches {
        let name = record
            .matched_file
            .as_ref()
            .map_or("MISSING", |file| file.original_name.as_str());
        let score = record
            .score
            .map_or_else(|| "-".to_string(), |score| format!("{score:.3}"));
        let _ = writeln!(
            out,
            "{} -> {} (score={}, strategy={})",
            plan.padded(record.prompt_sequence_index),
            name,
            score,
            record.strategy
        );
    }

    for file in &report.unused_files {
        if report.excluded_files.contains(&file.original_name) {
            let _ = writeln!(out, "UNUSED {} (excluded)", file.original_name);
        } else {
            let _ = writeln!(out, "UNUSED {}", file.original_name);
        }
    }

    out
}

#[cfg(test)]
#[path = "tests/text_log_tests.rs"]
mod tests;
