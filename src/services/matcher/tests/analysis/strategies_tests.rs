use super::*;
use crate::services::config::MatchConfig;
use crate::test_utils::{candidates, prompts};

#[test]
fn test_containment_either_direction() {
    let p = prompts(&["A cat sleeping on a window"]);
    let c = candidates(&[
        "user1_A_cat_sleeping_on_a_wi_abc12345.png",
        "user1_A_cat_sleeping_on_a_window_in_the_sun_abc12345.png",
        "user1_A_dog_abc12345.png",
    ]);

    let strategy = ContainmentStrategy;
    // Truncated body inside the prompt: graded by overlap
    let truncated = strategy.evaluate(&p[0], &c[0]).unwrap();
    assert!((truncated - 22.0 / 26.0).abs() < 1e-12);
    assert_eq!(strategy.evaluate(&p[0], &c[1]), Some(1.0));
    assert_eq!(strategy.evaluate(&p[0], &c[2]), None);
    assert!(strategy.accepts(0.0));
}

#[test]
fn test_containment_stem_hit_outranks_body_hit() {
    // Both leading words are split off as prefixes, leaving equal bodies
    let p = prompts(&["Red apple on a table"]);
    let c = candidates(&[
        "Green_apple_on_a_table_8ff92123.png",
        "Red_apple_on_a_table_abc12345.png",
    ]);
    assert_eq!(c[0].key.text, c[1].key.text);

    let green = ContainmentStrategy.evaluate(&p[0], &c[0]).unwrap();
    let red = ContainmentStrategy.evaluate(&p[0], &c[1]).unwrap();
    assert_eq!(red, 1.0);
    assert!(green < red, "body-only hit scored {green}");
}

#[test]
fn test_containment_tries_title_key() {
    let config = MatchConfig::default();
    let p = Prompt::new(1, "A photorealistic landscape bathed in golden light", &config)
        .with_title("Sunset_Over_Mountains", &config);
    let c = candidates(&["Sunset_Over_Mountains_01.png"]);

    assert_eq!(c[0].stem_key, "sunset_over_mountains_01");
    assert_eq!(ContainmentStrategy.evaluate(&p, &c[0]), Some(1.0));

    let untitled = Prompt::new(1, "A photorealistic landscape bathed in golden light", &config);
    assert_eq!(ContainmentStrategy.evaluate(&untitled, &c[0]), None);
}

#[test]
fn test_fuzzy_takes_best_of_text_and_title() {
    let config = MatchConfig::default();
    let p = Prompt::new(1, "A photorealistic landscape", &config)
        .with_title("Sunset over mountains", &config);
    let c = candidates(&["user1_sunset_over_mountainz_abc12345.png"]);

    let strategy = FuzzyStrategy::new(FuzzyMetric::SequenceRatio, 0.85);
    let score = strategy.evaluate(&p, &c[0]).unwrap();
    assert_eq!(
        score,
        sequence_ratio("sunset_over_mountains", "sunset_over_mountainz")
    );
    assert!(strategy.accepts(score));
}

#[test]
fn test_containment_checks_stem_key() {
    // The leading word was split off as a prefix; the stem still contains the prompt
    let p = prompts(&["robot"]);
    let c = candidates(&["robot_dance_party_abc12345.png"]);
    assert_eq!(c[0].key.text, "dance_party");
    assert_eq!(ContainmentStrategy.evaluate(&p[0], &c[0]), Some(1.0));
}

#[test]
fn test_containment_ignores_empty_keys() {
    let p = prompts(&["!!!"]);
    let c = candidates(&["sunset.png"]);
    assert_eq!(p[0].key.text, "");
    assert_eq!(ContainmentStrategy.evaluate(&p[0], &c[0]), None);
}

#[test]
fn test_numeric_id_requires_equal_ids() {
    let p = prompts(&["12. A red barn", "A blue barn"]);
    let c = candidates(&["012_render.png", "13_render.png"]);

    let strategy = NumericIdStrategy;
    assert_eq!(strategy.evaluate(&p[0], &c[0]), Some(1.0));
    assert_eq!(strategy.evaluate(&p[0], &c[1]), None);
    assert_eq!(strategy.evaluate(&p[1], &c[0]), None);
    assert!(strategy.accepts(0.0));
}

#[test]
fn test_fuzzy_threshold_gate() {
    let strategy = FuzzyStrategy::new(FuzzyMetric::SequenceRatio, 0.85);
    assert!(strategy.accepts(0.85));
    assert!(strategy.accepts(0.9));
    assert!(!strategy.accepts(0.84));
}

#[test]
fn test_fuzzy_scores_ratio() {
    let p = prompts(&["A dragon in the sky"]);
    let c = candidates(&["user1_A_dog_in_a_park_ffff0000.png"]);

    let strategy = FuzzyStrategy::new(FuzzyMetric::SequenceRatio, 0.85);
    let score = strategy.evaluate(&p[0], &c[0]).unwrap();
    assert!(score < 0.85);
    assert_eq!(
        score,
        sequence_ratio("a_dragon_in_the_sky", "a_dog_in_a_park")
    );
}

#[test]
fn test_fuzzy_levenshtein_metric() {
    let strategy = FuzzyStrategy::new(FuzzyMetric::Levenshtein, 0.5);
    assert_eq!(strategy.similarity("kitten", "kitten"), 1.0);
    let value = strategy.similarity("kitten", "sitting");
    assert!((value - strsim::normalized_levenshtein("kitten", "sitting")).abs() < 1e-12);
}

#[test]
fn test_fuzzy_skips_empty_keys() {
    let p = prompts(&["..."]);
    let c = candidates(&["sunset.png"]);
    let strategy = FuzzyStrategy::new(FuzzyMetric::SequenceRatio, 0.0);
    assert_eq!(strategy.evaluate(&p[0], &c[0]), None);
}

#[test]
fn test_fuzzy_threshold_is_clamped() {
    let strategy = FuzzyStrategy::new(FuzzyMetric::SequenceRatio, 4.0);
    assert_eq!(strategy.threshold, 1.0);
}
