//! Greedy, order-sensitive assignment of prompts to candidate files.
//!
//! Prompts are visited in ascending sequence index; each claims its best
//! remaining candidate if that candidate passes its tier's gate. Claimed
//! candidates are never reconsidered. Not a global optimum by construction.

use rayon::prelude::*;
use std::cmp::Ordering;

#[cfg(feature = "debug_matcher")]
use log::debug;

use crate::services::config::MatchConfig;
use crate::services::matcher::analysis::scorer::SimilarityScorer;
use crate::services::matcher::{
    CandidateFile, MatchRecord, MatchStrategy, Prompt, RunReport, ScoredAttempt,
};
use crate::types::errors::{MatchError, MatchResult};

/// Candidate set plus consumption flags, owned by a single `assign` call.
#[derive(Debug)]
pub struct RunContext {
    candidates: Vec<CandidateFile>,
    consumed: Vec<bool>,
    excluded: Vec<bool>,
}

impl RunContext {
    /// Takes ownership of the candidates; ids are reset to their positions.
    pub fn new(mut candidates: Vec<CandidateFile>) -> Self {
        for (position, candidate) in candidates.iter_mut().enumerate() {
            candidate.id = position;
        }
        let len = candidates.len();
        Self {
            candidates,
            consumed: vec![false; len],
            excluded: vec![false; len],
        }
    }

    pub fn candidates(&self) -> &[CandidateFile] {
        &self.candidates
    }

    /// Ids of candidates still available, in stable order.
    pub fn remaining_ids(&self) -> Vec<usize> {
        (0..self.candidates.len())
            .filter(|&id| !self.consumed[id] && !self.excluded[id])
            .collect()
    }

    pub fn is_consumed(&self, id: usize) -> bool {
        self.consumed[id]
    }

    /// Marks a candidate as claimed. Returns false if it already was.
    pub fn consume(&mut self, id: usize) -> bool {
        if self.consumed[id] {
            return false;
        }
        self.consumed[id] = true;
        true
    }

    pub fn exclude(&mut self, id: usize) {
        self.excluded[id] = true;
    }

    /// Unconsumed candidates and the names of excluded ones.
    pub fn into_unused(self) -> (Vec<CandidateFile>, Vec<String>) {
        let mut unused = Vec::new();
        let mut excluded = Vec::new();
        for (id, candidate) in self.candidates.into_iter().enumerate() {
            if self.consumed[id] {
                continue;
            }
            if self.excluded[id] {
                excluded.push(candidate.original_name.clone());
            }
            unused.push(candidate);
        }
        (unused, excluded)
    }
}

/// Default ladder with the fuzzy acceptance threshold overridden.
pub fn assign_with_threshold(
    prompts: &[Prompt],
    candidates: Vec<CandidateFile>,
    threshold: f64,
) -> MatchResult<RunReport> {
    let config = MatchConfig {
        fuzzy_threshold: threshold.clamp(0.0, 1.0),
        ..MatchConfig::default()
    };
    let mut scorer = SimilarityScorer::from_config(&config);
    assign(prompts, candidates, &mut scorer)
}

/// Assign every prompt at most one candidate, never reusing a candidate.
///
/// Fails fast on empty input; an unmatched prompt is a normal outcome.
pub fn assign(
    prompts: &[Prompt],
    candidates: Vec<CandidateFile>,
    scorer: &mut SimilarityScorer,
) -> MatchResult<RunReport> {
    if prompts.is_empty() {
        return Err(MatchError::NoPrompts);
    }
    if candidates.is_empty() {
        return Err(MatchError::NoCandidates);
    }

    let mut ctx = RunContext::new(candidates);
    scorer.prepare(prompts, ctx.candidates());
    let scorer: &SimilarityScorer = scorer;

    for id in 0..ctx.candidates().len() {
        if !scorer.can_score(&ctx.candidates()[id]) {
            log::warn!(
                "Excluding {}: no strategy can score it",
                ctx.candidates()[id].original_name
            );
            ctx.exclude(id);
        }
    }

    let mut ordered: Vec<&Prompt> = prompts.iter().collect();
    ordered.sort_by_key(|prompt| prompt.sequence_index);

    let mut matches = Vec::with_capacity(ordered.len());
    let mut missing_prompts = Vec::new();

    for prompt in ordered {
        let remaining = ctx.remaining_ids();
        let scored: Vec<(usize, ScoredAttempt)> = remaining
            .par_iter()
            .filter_map(|&id| {
                scorer
                    .score(prompt, &ctx.candidates()[id])
                    .map(|attempt| (id, attempt))
            })
            .collect();

        #[cfg(feature = "debug_matcher")]
        for (id, attempt) in &scored {
            debug!(
                "[MATCHER_CALIBRATION] prompt={} candidate={} score={:.3} strategy={} accepted={}",
                prompt.sequence_index,
                ctx.candidates()[*id].original_name,
                attempt.score,
                attempt.strategy,
                attempt.accepted
            );
        }

        let record = match select_best(&scored) {
            Some((id, attempt)) if attempt.accepted => {
                ctx.consume(id);
                let file = ctx.candidates()[id].clone();
                log::debug!(
                    "Prompt {} -> {} ({} {:.3})",
                    prompt.sequence_index,
                    file.original_name,
                    attempt.strategy,
                    attempt.score
                );
                MatchRecord {
                    prompt_sequence_index: prompt.sequence_index,
                    prompt_text: prompt.raw_text.clone(),
                    matched_file: Some(file),
                    score: Some(attempt.score),
                    strategy: attempt.strategy,
                }
            }
            best => {
                log::debug!(
                    "Prompt {} unmatched (best {:?})",
                    prompt.sequence_index,
                    best.map(|(_, attempt)| attempt.score)
                );
                missing_prompts.push(prompt.clone());
                MatchRecord {
                    prompt_sequence_index: prompt.sequence_index,
                    prompt_text: prompt.raw_text.clone(),
                    matched_file: None,
                    score: best.map(|(_, attempt)| attempt.score),
                    strategy: best.map_or(MatchStrategy::None, |(_, attempt)| attempt.strategy),
                }
            }
        };
        matches.push(record);
    }

    let (unused_files, excluded_files) = ctx.into_unused();
    let report = RunReport {
        matches,
        missing_prompts,
        unused_files,
        excluded_files,
    };

    log::info!(
        "Matched {}/{} prompts; {} missing, {} unused file(s)",
        report.matched_count(),
        report.matches.len(),
        report.missing_prompts.len(),
        report.unused_files.len()
    );

    Ok(report)
}

/// Accepted > exact tier (containment over numeric id) > score > tier rank;
/// earliest candidate on full ties.
pub fn compare_attempts(a: &ScoredAttempt, b: &ScoredAttempt) -> Ordering {
    a.accepted
        .cmp(&b.accepted)
        .then_with(|| a.strategy.exact_rank().cmp(&b.strategy.exact_rank()))
        .then_with(|| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal))
        .then_with(|| a.strategy.rank().cmp(&b.strategy.rank()))
}

fn select_best(scored: &[(usize, ScoredAttempt)]) -> Option<(usize, ScoredAttempt)> {
    let mut best: Option<(usize, ScoredAttempt)> = None;
    for &(id, attempt) in scored {
        let replace = match best {
            None => true,
            Some((_, current)) => compare_attempts(&attempt, &current) == Ordering::Greater,
        };
        if replace {
            best = Some((id, attempt));
        }
    }
    best
}

#[cfg(test)]
#[path = "../tests/pipeline/assign_tests.rs"]
mod tests;
