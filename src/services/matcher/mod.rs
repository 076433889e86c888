//! Prompt-to-asset matcher.
//!
//! Normalizes prompts and filenames into comparable keys, scores every
//! prompt/candidate pair through a strategy ladder, and assigns candidates to
//! prompts greedily in prompt order without reuse.
pub mod analysis;
pub mod core;
pub mod models;
pub mod pipeline;

pub use models::types::{
    AssetHandle, CandidateFile, MatchKey, MatchRecord, MatchStrategy, Prompt, RunReport,
    ScoredAttempt,
};

pub use analysis::scorer::SimilarityScorer;
pub use analysis::strategies::{
    ContainmentStrategy, FuzzyStrategy, NumericIdStrategy, ScoringStrategy,
};
pub use analysis::visual::VisualStrategy;
pub use self::core::decomposer::{decompose, decompose_with, DecomposeRules, FilenameParts};
pub use self::core::normalizer::{normalize, normalize_with};
pub use pipeline::assign::{assign, assign_with_threshold, RunContext};

use crate::services::config::MatchConfig;
use crate::types::errors::MatchResult;

/// Build candidates from `(name, handle)` pairs in the given order.
pub fn build_candidates<I>(items: I, config: &MatchConfig) -> MatchResult<Vec<CandidateFile>>
where
    I: IntoIterator<Item = (String, AssetHandle)>,
{
    let rules = DecomposeRules::try_from(&config.decompose)?;
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(id, (name, handle))| CandidateFile::new(id, name, handle, config, &rules))
        .collect())
}

#[cfg(test)]
#[path = "tests/required_tests.rs"]
mod required_tests;
