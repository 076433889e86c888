//! Sequential target names for a finished run.

use crate::services::config::EmitOptions;
use crate::services::matcher::{CandidateFile, RunReport};

/// One output slot per prompt, matched or not.
#[derive(Debug, Clone)]
pub struct RenameEntry {
    pub sequence_index: usize,
    /// `{prefix}{index:0width$}.{ext}`; for missing prompts the default extension is used.
    pub target_name: String,
    pub source: Option<CandidateFile>,
}

#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    pub width: usize,
    pub entries: Vec<RenameEntry>,
}

impl RenamePlan {
    /// Entries that have a file to write, with that file.
    pub fn matched(&self) -> impl Iterator<Item = (&RenameEntry, &CandidateFile)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.source.as_ref().map(|source| (entry, source)))
    }

    /// Zero-padded index as used in target names.
    pub fn padded(&self, sequence_index: usize) -> String {
        format!("{:0width$}", sequence_index, width = self.width)
    }
}

/// Digits needed for `count` items, never fewer than 3.
pub fn padding_width(count: usize) -> usize {
    count.to_string().len().max(3)
}

pub fn emit(report: &RunReport, width: usize) -> RenamePlan {
    emit_with(report, width, &EmitOptions::default())
}

/// Build the plan in prompt order. Indices are never renumbered, so gaps
/// from missing prompts stay visible in the output.
pub fn emit_with(report: &RunReport, width: usize, options: &EmitOptions) -> RenamePlan {
    let width = width.max(1);
    let prefix = sanitize_filename::sanitize(&options.prefix);
    let default_ext = options
        .default_extension
        .trim_start_matches('.')
        .to_lowercase();

    let entries = report
        .matches
        .iter()
        .map(|record| {
            let ext = record
                .matched_file
                .as_ref()
                .and_then(|file| file.extension())
                .unwrap_or_else(|| default_ext.clone());
            RenameEntry {
                sequence_index: record.prompt_sequence_index,
                target_name: format!(
                    "{prefix}{:0width$}.{ext}",
                    record.prompt_sequence_index
                ),
                source: record.matched_file.clone(),
            }
        })
        .collect();

    RenamePlan { width, entries }
}

#[cfg(test)]
#[path = "tests/emitter_tests.rs"]
mod tests;
