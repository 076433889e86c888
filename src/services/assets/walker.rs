//! Asset directory listing.
//! Uses `walkdir` without following symlinks; output order is stable by name.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::services::config::{MatchConfig, ScanOptions};
use crate::services::matcher::{self, AssetHandle, CandidateFile};
use crate::types::errors::{MatchError, MatchResult};

/// One media file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// File name only, as matched against prompts.
    pub name: String,
    pub path: PathBuf,
}

/// List candidate media files under `dir`.
///
/// Only the top level is read unless `options.recursive` is set. Unreadable
/// entries are skipped with a warning.
pub fn scan_assets(dir: &Path, options: &ScanOptions) -> MatchResult<Vec<AssetEntry>> {
    if !dir.is_dir() {
        return Err(MatchError::Io {
            path: dir.display().to_string(),
            message: "asset directory does not exist or is not a directory".into(),
        });
    }

    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(dir)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter();

    let mut entries = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if !has_allowed_extension(path, &options.extensions) {
            log::debug!("Ignoring non-media file {name}");
            continue;
        }

        entries.push(AssetEntry {
            name,
            path: path.to_path_buf(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    log::info!("Found {} asset(s) in {}", entries.len(), dir.display());
    Ok(entries)
}

/// Candidates backed by the scanned paths, ids in scan order.
pub fn build_candidates(
    entries: &[AssetEntry],
    config: &MatchConfig,
) -> MatchResult<Vec<CandidateFile>> {
    matcher::build_candidates(
        entries
            .iter()
            .map(|entry| (entry.name.clone(), AssetHandle::Path(entry.path.clone()))),
        config,
    )
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

#[cfg(test)]
#[path = "tests/walker_tests.rs"]
mod tests;
