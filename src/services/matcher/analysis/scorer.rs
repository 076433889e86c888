//! Strategy ladder: ordered strategies injected at construction, evaluated
//! top-down per candidate. First accepted strategy wins for that candidate.

use std::sync::Arc;

use crate::services::config::{MatchConfig, VisualMode};
use crate::services::matcher::analysis::strategies::{
    ContainmentStrategy, FuzzyStrategy, NumericIdStrategy, ScoringStrategy,
};
use crate::services::matcher::analysis::visual::VisualStrategy;
use crate::services::matcher::core::normalizer;
use crate::services::matcher::{
    AssetHandle, CandidateFile, MatchKey, MatchStrategy, Prompt, ScoredAttempt,
};

pub struct SimilarityScorer {
    strategies: Vec<Box<dyn ScoringStrategy>>,
}

impl SimilarityScorer {
    pub fn new(strategies: Vec<Box<dyn ScoringStrategy>>) -> Self {
        Self { strategies }
    }

    /// Containment → numeric id → fuzzy, plus visual per `config.visual.mode`.
    pub fn from_config(config: &MatchConfig) -> Self {
        let mut strategies: Vec<Box<dyn ScoringStrategy>> = Vec::new();

        if config.visual.mode != VisualMode::Only {
            strategies.push(Box::new(ContainmentStrategy));
            strategies.push(Box::new(NumericIdStrategy));
            strategies.push(Box::new(FuzzyStrategy::new(
                config.fuzzy_metric,
                config.fuzzy_threshold,
            )));
        }
        if config.visual.mode != VisualMode::Off {
            strategies.push(Box::new(VisualStrategy::new(config.visual.clone())));
        }

        Self::new(strategies)
    }

    pub fn tiers(&self) -> Vec<MatchStrategy> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    pub fn prepare(&mut self, prompts: &[Prompt], candidates: &[CandidateFile]) {
        for strategy in &mut self.strategies {
            strategy.prepare(prompts, candidates);
        }
    }

    /// A candidate nobody can score is excluded from the run.
    pub fn can_score(&self, candidate: &CandidateFile) -> bool {
        self.strategies.iter().any(|s| s.can_score(candidate))
    }

    /// Walk the ladder for one pair.
    ///
    /// Returns the first accepted attempt; otherwise the best rejected one
    /// (higher score, then stronger tier); `None` if no strategy produced a value.
    pub fn score(&self, prompt: &Prompt, candidate: &CandidateFile) -> Option<ScoredAttempt> {
        let mut best_rejected: Option<ScoredAttempt> = None;

        for strategy in &self.strategies {
            if !strategy.can_score(candidate) {
                continue;
            }
            let Some(score) = strategy.evaluate(prompt, candidate) else {
                continue;
            };

            let attempt = ScoredAttempt {
                score: score.clamp(0.0, 1.0),
                strategy: strategy.tier(),
                accepted: strategy.accepts(score),
            };
            if attempt.accepted {
                return Some(attempt);
            }

            let better = match best_rejected {
                None => true,
                Some(current) => {
                    attempt.score > current.score
                        || (attempt.score == current.score
                            && attempt.strategy.rank() > current.strategy.rank())
                }
            };
            if better {
                best_rejected = Some(attempt);
            }
        }

        best_rejected
    }

    /// Score two bare normalized keys (text strategies only).
    pub fn score_keys(&self, prompt_key: &str, candidate_key: &str) -> Option<ScoredAttempt> {
        let prompt = Prompt {
            sequence_index: 0,
            raw_text: prompt_key.to_string(),
            reference: None,
            key: MatchKey {
                text: prompt_key.to_string(),
                numeric_id: normalizer::leading_numeric_id(prompt_key),
            },
            title: None,
            title_key: None,
        };
        let candidate = CandidateFile {
            id: 0,
            original_name: candidate_key.to_string(),
            key: MatchKey {
                text: candidate_key.to_string(),
                numeric_id: normalizer::leading_numeric_id(candidate_key),
            },
            stem_key: candidate_key.to_string(),
            handle: AssetHandle::Memory(Arc::from(Vec::<u8>::new())),
        };
        self.score(&prompt, &candidate)
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::from_config(&MatchConfig::default())
    }
}

#[cfg(test)]
#[path = "../tests/analysis/scorer_tests.rs"]
mod tests;
