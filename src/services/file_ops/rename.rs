//! Applies a rename plan to disk.
//!
//! Per-item failures are recorded and never abort the batch. Existing targets
//! are never overwritten.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::services::matcher::{AssetHandle, CandidateFile};
use crate::services::report::{RenameEntry, RenamePlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameMode {
    /// Leave the source in place.
    #[default]
    Copy,
    /// Remove the source once the target is written.
    Move,
}

/// Result of applying one plan entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { target: PathBuf },
    /// Entry has no matched file (missing prompt).
    Skipped,
    /// Dry run: the target that would have been written.
    Planned { target: PathBuf },
    Failed(String),
}

impl RenameOutcome {
    pub fn failure(&self) -> Option<&str> {
        match self {
            RenameOutcome::Failed(cause) => Some(cause),
            _ => None,
        }
    }
}

/// Apply every entry of `plan` into `out_dir`, one outcome per entry.
pub fn apply_plan(
    plan: &RenamePlan,
    out_dir: &Path,
    mode: RenameMode,
    dry_run: bool,
) -> Vec<RenameOutcome> {
    if !dry_run {
        if let Err(e) = fs::create_dir_all(out_dir) {
            let cause = format!("Failed to create {}: {e}", out_dir.display());
            log::error!("{cause}");
            return plan
                .entries
                .iter()
                .map(|entry| match entry.source {
                    Some(_) => RenameOutcome::Failed(cause.clone()),
                    None => RenameOutcome::Skipped,
                })
                .collect();
        }
    }

    let outcomes: Vec<RenameOutcome> = plan
        .entries
        .iter()
        .map(|entry| apply_entry(entry, out_dir, mode, dry_run))
        .collect();

    let failed = outcomes.iter().filter(|o| o.failure().is_some()).count();
    if failed > 0 {
        log::warn!("{failed} of {} rename(s) failed", outcomes.len());
    }
    outcomes
}

fn apply_entry(
    entry: &RenameEntry,
    out_dir: &Path,
    mode: RenameMode,
    dry_run: bool,
) -> RenameOutcome {
    let Some(source) = &entry.source else {
        return RenameOutcome::Skipped;
    };
    let target = out_dir.join(&entry.target_name);

    if target.exists() {
        return RenameOutcome::Failed(format!("target already exists: {}", target.display()));
    }
    if dry_run {
        log::info!("[dry-run] {} -> {}", source.original_name, entry.target_name);
        return RenameOutcome::Planned { target };
    }

    match write_target(source, &target, mode) {
        Ok(()) => {
            log::debug!("{} -> {}", source.original_name, target.display());
            RenameOutcome::Renamed { target }
        }
        Err(cause) => {
            log::warn!("Rename of {} failed: {cause}", source.original_name);
            RenameOutcome::Failed(cause)
        }
    }
}

fn write_target(source: &CandidateFile, target: &Path, mode: RenameMode) -> Result<(), String> {
    match (&source.handle, mode) {
        (AssetHandle::Path(path), RenameMode::Copy) => copy_file(path, target),
        (AssetHandle::Path(path), RenameMode::Move) => fs::rename(path, target).or_else(|e| {
            // Cross-device moves need copy + delete
            log::warn!("rename failed, attempting copy: {e}");
            copy_file(path, target)?;
            fs::remove_file(path)
                .map_err(|e| format!("Failed to remove source after copy: {e}"))
        }),
        (AssetHandle::Memory(bytes), _) => fs::write(target, bytes).map_err(|e| {
            discard_partial(target);
            format!("Failed to write {}: {e}", target.display())
        }),
    }
}

/// Copy `path` to `target`, leaving no partial target behind on failure.
fn copy_file(path: &Path, target: &Path) -> Result<(), String> {
    let mut reader =
        File::open(path).map_err(|e| format!("Failed to copy {}: {e}", path.display()))?;
    let mut writer = File::create_new(target)
        .map_err(|e| format!("Failed to create {}: {e}", target.display()))?;
    let copied = io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all());
    drop(writer);
    copied.map(|_| ()).map_err(|e| {
        discard_partial(target);
        format!("Failed to copy {}: {e}", path.display())
    })
}

fn discard_partial(target: &Path) {
    if let Err(e) = fs::remove_file(target) {
        if e.kind() != io::ErrorKind::NotFound {
            log::warn!("Could not remove partial {}: {e}", target.display());
        }
    }
}

#[cfg(test)]
#[path = "tests/rename_tests.rs"]
mod tests;
