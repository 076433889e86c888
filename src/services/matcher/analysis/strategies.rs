//! Text strategies of the scoring ladder.
//!
//! Each strategy scores one prompt/candidate pair in `[0, 1]` and owns its
//! acceptance gate. `None` means the strategy has nothing to say about the pair.

use crate::services::config::FuzzyMetric;
use crate::services::matcher::analysis::sequence::sequence_ratio;
use crate::services::matcher::{CandidateFile, MatchStrategy, Prompt};

pub trait ScoringStrategy: Send + Sync {
    fn tier(&self) -> MatchStrategy;

    fn evaluate(&self, prompt: &Prompt, candidate: &CandidateFile) -> Option<f64>;

    fn accepts(&self, score: f64) -> bool;

    /// False when the candidate cannot be scored at all (e.g. undecodable frame).
    fn can_score(&self, _candidate: &CandidateFile) -> bool {
        true
    }

    /// Per-run setup before the assignment loop (decode caches etc).
    fn prepare(&mut self, _prompts: &[Prompt], _candidates: &[CandidateFile]) {}
}

/// Exact substring containment in either direction.
///
/// A hit on the full stem scores 1.0. A hit on the decomposed body alone
/// scores its overlap ratio, so a file whose leading word was split off as a
/// prefix never ties with the file that actually carries that word.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainmentStrategy;

impl ScoringStrategy for ContainmentStrategy {
    fn tier(&self) -> MatchStrategy {
        MatchStrategy::Containment
    }

    fn evaluate(&self, prompt: &Prompt, candidate: &CandidateFile) -> Option<f64> {
        prompt
            .text_keys()
            .filter_map(|key| containment_score(key, candidate))
            .reduce(f64::max)
    }

    fn accepts(&self, _score: f64) -> bool {
        true
    }
}

fn containment_score(key: &str, candidate: &CandidateFile) -> Option<f64> {
    if contains_either(key, &candidate.stem_key) {
        return Some(1.0);
    }
    let body = candidate.key.text.as_str();
    contains_either(key, body).then(|| overlap_ratio(key, body))
}

fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Length of the shorter key over the longer one.
fn overlap_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = (a.chars().count(), b.chars().count());
    a.min(b) as f64 / a.max(b) as f64
}

/// Equal leading integer tokens (`"12. A cat"` vs `"012_cat.png"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericIdStrategy;

impl ScoringStrategy for NumericIdStrategy {
    fn tier(&self) -> MatchStrategy {
        MatchStrategy::NumericId
    }

    fn evaluate(&self, prompt: &Prompt, candidate: &CandidateFile) -> Option<f64> {
        match (prompt.key.numeric_id, candidate.key.numeric_id) {
            (Some(a), Some(b)) if a == b => Some(1.0),
            _ => None,
        }
    }

    fn accepts(&self, _score: f64) -> bool {
        true
    }
}

/// Character-level similarity gated by a threshold.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyStrategy {
    pub metric: FuzzyMetric,
    pub threshold: f64,
}

impl FuzzyStrategy {
    pub fn new(metric: FuzzyMetric, threshold: f64) -> Self {
        Self {
            metric,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let value = match self.metric {
            FuzzyMetric::SequenceRatio => sequence_ratio(a, b),
            FuzzyMetric::Levenshtein => strsim::normalized_levenshtein(a, b),
        };
        value.clamp(0.0, 1.0)
    }
}

impl ScoringStrategy for FuzzyStrategy {
    fn tier(&self) -> MatchStrategy {
        MatchStrategy::Fuzzy
    }

    fn evaluate(&self, prompt: &Prompt, candidate: &CandidateFile) -> Option<f64> {
        if candidate.key.text.is_empty() {
            return None;
        }
        prompt
            .text_keys()
            .map(|key| self.similarity(key, &candidate.key.text))
            .reduce(f64::max)
    }

    fn accepts(&self, score: f64) -> bool {
        score >= self.threshold
    }
}

#[cfg(test)]
#[path = "../tests/analysis/strategies_tests.rs"]
mod tests;
