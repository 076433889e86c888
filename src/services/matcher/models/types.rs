//! Domain types for a matching run.
//!
//! Contains: MatchStrategy, MatchKey, Prompt, AssetHandle, CandidateFile,
//! ScoredAttempt, MatchRecord, RunReport.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::services::config::MatchConfig;
use crate::services::matcher::core::decomposer::{self, DecomposeRules};
use crate::services::matcher::core::normalizer;

/// Strategy that produced a score. Doubles as the trust tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// One normalized key contains the other.
    Containment,
    /// Equal leading integer tokens.
    NumericId,
    /// Sequence-alignment ratio.
    Fuzzy,
    /// Structural similarity of reference image and first frame.
    Visual,
    /// Nothing was left to compare against.
    None,
}

impl MatchStrategy {
    /// Relative trust: containment > numeric id > fuzzy > visual > none.
    pub fn rank(self) -> u8 {
        match self {
            MatchStrategy::Containment => 4,
            MatchStrategy::NumericId => 3,
            MatchStrategy::Fuzzy => 2,
            MatchStrategy::Visual => 1,
            MatchStrategy::None => 0,
        }
    }

    /// Exact tiers dominate approximate ones regardless of raw score.
    pub fn is_exact(self) -> bool {
        matches!(self, MatchStrategy::Containment | MatchStrategy::NumericId)
    }

    /// Rank among exact tiers; 0 for approximate ones, which compare on score.
    pub fn exact_rank(self) -> u8 {
        if self.is_exact() {
            self.rank()
        } else {
            0
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            MatchStrategy::Containment => "containment",
            MatchStrategy::NumericId => "numeric_id",
            MatchStrategy::Fuzzy => "fuzzy",
            MatchStrategy::Visual => "visual",
            MatchStrategy::None => "none",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Comparable form of a prompt or filename.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchKey {
    /// Normalized text key.
    pub text: String,
    /// Leading integer token of the raw string, if any.
    pub numeric_id: Option<u64>,
}

impl MatchKey {
    pub fn new(raw: &str, noise_suffixes: &[String]) -> Self {
        Self {
            text: normalizer::normalize_with(raw, noise_suffixes),
            numeric_id: normalizer::leading_numeric_id(raw),
        }
    }
}

/// One prompt of the ordered input list. Immutable after parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// 1-based position in the input; defines output order.
    pub sequence_index: usize,
    pub raw_text: String,
    /// Reference image (URL or local path) for visual scoring.
    pub reference: Option<String>,
    pub key: MatchKey,
    /// Short title from `id|title|prompt` lines; generators often name files after it.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_key: Option<String>,
}

impl Prompt {
    pub fn new(sequence_index: usize, raw_text: impl Into<String>, config: &MatchConfig) -> Self {
        let raw_text = raw_text.into();
        let key = MatchKey::new(&raw_text, &config.noise_suffixes);
        Self {
            sequence_index,
            raw_text,
            reference: None,
            key,
            title: None,
            title_key: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Attach an alternate title key. Titles that normalize to nothing are dropped.
    pub fn with_title(mut self, title: impl Into<String>, config: &MatchConfig) -> Self {
        let title = title.into();
        let key = normalizer::normalize_with(&title, &config.noise_suffixes);
        if !key.is_empty() {
            self.title = Some(title);
            self.title_key = Some(key);
        }
        self
    }

    /// Non-empty text keys to compare against filenames: the prompt key, then the title key.
    pub fn text_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.text.as_str())
            .chain(self.title_key.as_deref())
            .filter(|key| !key.is_empty())
    }

    /// Build prompts 1..=n from plain strings.
    pub fn from_texts<S: AsRef<str>>(texts: &[S], config: &MatchConfig) -> Vec<Prompt> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Prompt::new(i + 1, text.as_ref(), config))
            .collect()
    }
}

/// Where a candidate's bytes live.
#[derive(Debug, Clone)]
pub enum AssetHandle {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

impl AssetHandle {
    pub fn read_bytes(&self) -> std::io::Result<Arc<[u8]>> {
        match self {
            AssetHandle::Path(path) => Ok(Arc::from(std::fs::read(path)?)),
            AssetHandle::Memory(bytes) => Ok(bytes.clone()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            AssetHandle::Path(path) => Some(path),
            AssetHandle::Memory(_) => None,
        }
    }
}

/// One uploaded or scanned asset. Consumption is tracked by the run context.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Position in the run's stable iteration order.
    pub id: usize,
    pub original_name: String,
    /// Key of the decomposed body.
    pub key: MatchKey,
    /// Normalized stem with the identifier suffix removed.
    pub stem_key: String,
    pub handle: AssetHandle,
}

impl CandidateFile {
    pub fn new(
        id: usize,
        original_name: impl Into<String>,
        handle: AssetHandle,
        config: &MatchConfig,
        rules: &DecomposeRules,
    ) -> Self {
        let original_name = original_name.into();
        let parts = decomposer::decompose_with(&original_name, rules);
        let stem = decomposer::stem_without_identifier(&original_name, rules);

        let stem_key = normalizer::normalize_with(&stem, &config.noise_suffixes);
        let body_key = normalizer::normalize_with(&parts.body, &config.noise_suffixes);
        let text = if body_key.is_empty() {
            stem_key.clone()
        } else {
            body_key
        };

        Self {
            id,
            key: MatchKey {
                text,
                numeric_id: normalizer::leading_numeric_id(&stem),
            },
            stem_key,
            original_name,
            handle,
        }
    }

    /// Lowercased extension of the original name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.original_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Best outcome of the strategy ladder for one prompt/candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredAttempt {
    pub score: f64,
    pub strategy: MatchStrategy,
    /// Whether the strategy's acceptance gate passed.
    pub accepted: bool,
}

/// Outcome for a single prompt. Exactly one per prompt.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub prompt_sequence_index: usize,
    pub prompt_text: String,
    pub matched_file: Option<CandidateFile>,
    /// Score of the winning attempt, or of the best rejected one.
    pub score: Option<f64>,
    pub strategy: MatchStrategy,
}

impl MatchRecord {
    pub fn is_matched(&self) -> bool {
        self.matched_file.is_some()
    }
}

/// Aggregate result of one `assign` call.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Ordered by ascending prompt sequence index.
    pub matches: Vec<MatchRecord>,
    pub missing_prompts: Vec<Prompt>,
    /// Unconsumed candidates in stable order.
    pub unused_files: Vec<CandidateFile>,
    /// Names of candidates no strategy could score (subset of `unused_files`).
    pub excluded_files: Vec<String>,
}

impl RunReport {
    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_matched()).count()
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
