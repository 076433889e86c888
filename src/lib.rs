use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use services::assets;
use services::config::{MatchConfig, VisualMode};
use services::file_ops::{apply_plan, RenameMode, RenameOutcome};
use services::matcher::{assign, AssetHandle, SimilarityScorer};
use services::prompts::parse_prompts;
use services::report::{self, RenamePlan};

pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

/// Match generated media files back to their prompts and rename them in prompt order.
#[derive(Parser, Debug, Clone)]
#[command(name = "promptmatch", version)]
pub struct Cli {
    /// Prompt list, one prompt per line.
    #[arg(long)]
    pub prompts: PathBuf,

    /// Directory holding the generated files.
    #[arg(long)]
    pub assets: PathBuf,

    /// Output directory for renamed files and reports.
    #[arg(long)]
    pub out: PathBuf,

    /// Also bundle renamed files and reports into this zip.
    #[arg(long)]
    pub zip: Option<PathBuf>,

    /// JSON config; unspecified fields keep their defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fuzzy acceptance threshold in [0, 1].
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Prefix for target names.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Fall back to visual similarity against prompt reference images.
    #[arg(long)]
    pub visual: bool,

    /// Move files instead of copying them.
    #[arg(long = "move")]
    pub move_files: bool,

    /// Scan the asset directory recursively.
    #[arg(long)]
    pub recursive: bool,

    /// Report what would happen without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,
}

/// Counts for one CLI run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub matched: usize,
    pub missing: usize,
    pub unused: usize,
    pub failed: usize,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let summary = execute(&cli)?;
    println!(
        "matched {}, missing {}, unused {}, failed renames {}",
        summary.matched, summary.missing, summary.unused, summary.failed
    );
    Ok(())
}

/// Full pipeline: parse, scan, assign, rename, write reports.
pub fn execute(cli: &Cli) -> Result<RunSummary> {
    let config = resolve_config(cli)?;

    let bytes = std::fs::read(&cli.prompts)
        .with_context(|| format!("Failed to read prompts from {}", cli.prompts.display()))?;
    let prompts = parse_prompts(&bytes, &config).context("Prompt file has no prompts")?;

    let entries = assets::scan_assets(&cli.assets, &config.scan)
        .with_context(|| format!("Failed to scan {}", cli.assets.display()))?;
    let candidates = assets::build_candidates(&entries, &config)?;

    let mut scorer = SimilarityScorer::from_config(&config);
    let run = assign(&prompts, candidates, &mut scorer).context("Matching failed")?;

    let width = report::padding_width(prompts.len());
    let plan = report::emit_with(&run, width, &config.emit);

    let mode = if cli.move_files {
        RenameMode::Move
    } else {
        RenameMode::Copy
    };
    let outcomes = apply_plan(&plan, &cli.out, mode, cli.dry_run);

    let text_log = report::render_text_log(&run, &plan);
    let mut csv_bytes = Vec::new();
    report::write_csv(&mut csv_bytes, &run, &plan, &outcomes)?;

    if cli.dry_run {
        print!("{text_log}");
    } else {
        let log_path = cli.out.join(report::archive::TEXT_LOG_NAME);
        std::fs::write(&log_path, &text_log)
            .with_context(|| format!("Failed to write {}", log_path.display()))?;
        let csv_path = cli.out.join(report::archive::CSV_NAME);
        std::fs::write(&csv_path, &csv_bytes)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;

        if let Some(zip_path) = &cli.zip {
            let written = relocated(&plan, &outcomes);
            report::write_archive(zip_path, &written, &run.unused_files, &text_log, &csv_bytes)
                .with_context(|| format!("Failed to write archive {}", zip_path.display()))?;
        }
    }

    Ok(RunSummary {
        matched: run.matched_count(),
        missing: run.missing_prompts.len(),
        unused: run.unused_files.len(),
        failed: outcomes.iter().filter(|o| o.failure().is_some()).count(),
    })
}

fn resolve_config(cli: &Cli) -> Result<MatchConfig> {
    let mut config = MatchConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    if let Some(threshold) = cli.threshold {
        config.fuzzy_threshold = threshold;
    }
    if let Some(prefix) = &cli.prefix {
        config.emit.prefix = prefix.clone();
    }
    if cli.visual && config.visual.mode == VisualMode::Off {
        config.visual.mode = VisualMode::Fallback;
    }
    if cli.recursive {
        config.scan.recursive = true;
    }

    config.validate().context("Invalid command-line overrides")?;
    Ok(config)
}

/// Point matched entries at the files actually written, so the archive still
/// finds them after a move.
fn relocated(plan: &RenamePlan, outcomes: &[RenameOutcome]) -> RenamePlan {
    let mut plan = plan.clone();
    for (entry, outcome) in plan.entries.iter_mut().zip(outcomes) {
        if let (Some(source), RenameOutcome::Renamed { target }) = (entry.source.as_mut(), outcome)
        {
            source.handle = AssetHandle::Path(target.clone());
        }
    }
    plan
}
