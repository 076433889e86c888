use super::*;
use crate::services::config::{FuzzyMetric, VisualMode};
use crate::test_utils::{candidates, prompts};

/// Fixed-output strategy for ladder-order tests.
struct Fixed {
    tier: MatchStrategy,
    value: Option<f64>,
    gate: f64,
}

impl ScoringStrategy for Fixed {
    fn tier(&self) -> MatchStrategy {
        self.tier
    }

    fn evaluate(&self, _prompt: &Prompt, _candidate: &CandidateFile) -> Option<f64> {
        self.value
    }

    fn accepts(&self, score: f64) -> bool {
        score >= self.gate
    }
}

fn fixed(tier: MatchStrategy, value: Option<f64>, gate: f64) -> Box<dyn ScoringStrategy> {
    Box::new(Fixed { tier, value, gate })
}

#[test]
fn test_default_ladder_order() {
    let scorer = SimilarityScorer::default();
    assert_eq!(
        scorer.tiers(),
        vec![
            MatchStrategy::Containment,
            MatchStrategy::NumericId,
            MatchStrategy::Fuzzy
        ]
    );
}

#[test]
fn test_visual_modes_shape_ladder() {
    let mut config = MatchConfig::default();
    config.visual.mode = VisualMode::Fallback;
    assert_eq!(
        SimilarityScorer::from_config(&config).tiers().last(),
        Some(&MatchStrategy::Visual)
    );

    config.visual.mode = VisualMode::Only;
    assert_eq!(
        SimilarityScorer::from_config(&config).tiers(),
        vec![MatchStrategy::Visual]
    );
}

#[test]
fn test_first_accepted_strategy_wins() {
    let scorer = SimilarityScorer::new(vec![
        fixed(MatchStrategy::Containment, None, 0.0),
        fixed(MatchStrategy::Fuzzy, Some(0.9), 0.85),
        fixed(MatchStrategy::Visual, Some(0.99), 0.5),
    ]);
    let p = prompts(&["x"]);
    let c = candidates(&["y.png"]);

    let attempt = scorer.score(&p[0], &c[0]).unwrap();
    assert_eq!(attempt.strategy, MatchStrategy::Fuzzy);
    assert!(attempt.accepted);
    assert_eq!(attempt.score, 0.9);
}

#[test]
fn test_rejected_fuzzy_falls_through_to_visual() {
    let scorer = SimilarityScorer::new(vec![
        fixed(MatchStrategy::Fuzzy, Some(0.6), 0.85),
        fixed(MatchStrategy::Visual, Some(0.7), 0.5),
    ]);
    let p = prompts(&["x"]);
    let c = candidates(&["y.png"]);

    let attempt = scorer.score(&p[0], &c[0]).unwrap();
    assert_eq!(attempt.strategy, MatchStrategy::Visual);
    assert!(attempt.accepted);
}

#[test]
fn test_best_rejected_attempt_is_reported() {
    let scorer = SimilarityScorer::new(vec![
        fixed(MatchStrategy::Fuzzy, Some(0.6), 0.85),
        fixed(MatchStrategy::Visual, Some(0.3), 0.5),
    ]);
    let p = prompts(&["x"]);
    let c = candidates(&["y.png"]);

    let attempt = scorer.score(&p[0], &c[0]).unwrap();
    assert_eq!(attempt.strategy, MatchStrategy::Fuzzy);
    assert!(!attempt.accepted);
    assert_eq!(attempt.score, 0.6);
}

#[test]
fn test_no_values_yields_none() {
    let scorer = SimilarityScorer::new(vec![fixed(MatchStrategy::Containment, None, 0.0)]);
    let p = prompts(&["x"]);
    let c = candidates(&["y.png"]);
    assert!(scorer.score(&p[0], &c[0]).is_none());
}

#[test]
fn test_score_keys_containment_and_fuzzy() {
    let scorer = SimilarityScorer::default();

    let exact = scorer.score_keys("a_cat", "user1_a_cat_sleeping").unwrap();
    assert_eq!(exact.strategy, MatchStrategy::Containment);
    assert_eq!(exact.score, 1.0);

    let numeric = scorer.score_keys("12_red_barn", "12_blue_sky").unwrap();
    assert_eq!(numeric.strategy, MatchStrategy::NumericId);

    let fuzzy = scorer.score_keys("a_dragon_in_the_sky", "a_dog_in_a_park").unwrap();
    assert_eq!(fuzzy.strategy, MatchStrategy::Fuzzy);
    assert!(!fuzzy.accepted);
    assert!((0.0..1.0).contains(&fuzzy.score));
}

#[test]
fn test_levenshtein_metric_is_configurable() {
    let config = MatchConfig {
        fuzzy_metric: FuzzyMetric::Levenshtein,
        fuzzy_threshold: 0.0,
        ..MatchConfig::default()
    };
    let scorer = SimilarityScorer::from_config(&config);
    let attempt = scorer.score_keys("kitten", "sitting").unwrap();
    assert_eq!(attempt.strategy, MatchStrategy::Fuzzy);
    assert!(attempt.accepted);
    assert!((attempt.score - strsim::normalized_levenshtein("kitten", "sitting")).abs() < 1e-12);
}

#[test]
fn test_can_score_needs_any_strategy() {
    let scorer = SimilarityScorer::default();
    let c = candidates(&["y.png"]);
    assert!(scorer.can_score(&c[0]));

    let empty = SimilarityScorer::new(Vec::new());
    assert!(!empty.can_score(&c[0]));
}
