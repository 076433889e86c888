//! Zip bundle of renamed files plus the run reports.
//!
//! Files no prompt claimed go under `unused/` as `NNN_<original name>`, so the
//! bundle always carries every input file.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::services::matcher::CandidateFile;
use crate::services::report::RenamePlan;
use crate::types::errors::{MatchError, MatchResult};

pub const TEXT_LOG_NAME: &str = "report.txt";
pub const CSV_NAME: &str = "report.csv";
pub const UNUSED_DIR: &str = "unused";

/// Write the archive to `path`. Returns how many media files were stored.
pub fn write_archive(
    path: &Path,
    plan: &RenamePlan,
    unused: &[CandidateFile],
    text_log: &str,
    csv_bytes: &[u8],
) -> MatchResult<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MatchError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| MatchError::io(path, e))?;
    let stored = write_archive_to(file, plan, unused, text_log, csv_bytes)?;
    log::info!("Wrote {} file(s) to {}", stored, path.display());
    Ok(stored)
}

/// Unreadable sources are skipped with a warning; the reports are always written.
pub fn write_archive_to<W: Write + Seek>(
    writer: W,
    plan: &RenamePlan,
    unused: &[CandidateFile],
    text_log: &str,
    csv_bytes: &[u8],
) -> MatchResult<usize> {
    let mut zip = ZipWriter::new(writer);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let archive_err = |e: std::io::Error| MatchError::Archive(e.to_string());

    let renamed = plan
        .matched()
        .map(|(entry, source)| (entry.target_name.clone(), source));
    let leftovers = unused.iter().enumerate().map(|(i, source)| {
        let name = sanitize_filename::sanitize(&source.original_name);
        (format!("{UNUSED_DIR}/{:03}_{name}", i + 1), source)
    });

    let mut stored = 0;
    for (name, source) in renamed.chain(leftovers) {
        let bytes = match source.handle.read_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Skipping {} in archive: {e}", source.original_name);
                continue;
            }
        };
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&bytes).map_err(archive_err)?;
        stored += 1;
    }

    zip.start_file(TEXT_LOG_NAME, options)?;
    zip.write_all(text_log.as_bytes()).map_err(archive_err)?;
    zip.start_file(CSV_NAME, options)?;
    zip.write_all(csv_bytes).map_err(archive_err)?;

    zip.finish()?;
    Ok(stored)
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
