use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_sequence_ratio_known_values() {
    assert!(approx(sequence_ratio("abcd", "bcde"), 0.75));
    assert!(approx(sequence_ratio("tide", "diet"), 0.25));
    assert!(approx(sequence_ratio("abc", "abc"), 1.0));
}

#[test]
fn test_sequence_ratio_empty_inputs() {
    assert!(approx(sequence_ratio("", ""), 1.0));
    assert!(approx(sequence_ratio("abc", ""), 0.0));
    assert!(approx(sequence_ratio("", "abc"), 0.0));
}

#[test]
fn test_sequence_ratio_recurses_both_sides() {
    // "ab" + "yz" both match around the differing middle: M = 4, T = 10
    assert!(approx(sequence_ratio("abXyz", "abQyz"), 0.8));
}

#[test]
fn test_sequence_ratio_truncated_key_scores_high() {
    let full = "a_cat_sleeping_on_a_window";
    let truncated = "a_cat_sleeping_on_a_wi";
    let ratio = sequence_ratio(full, truncated);
    assert!(ratio > 0.9, "ratio was {ratio}");
}

#[test]
fn test_sequence_ratio_unrelated_keys_score_low() {
    let ratio = sequence_ratio("a_dragon_in_the_sky", "a_dog_in_a_park");
    assert!(ratio < 0.85, "ratio was {ratio}");
    assert!(ratio > 0.0);
}

#[test]
fn test_sequence_ratio_is_bounded() {
    let pairs = [("x", "y"), ("aaaa", "aa"), ("\u{e9}t\u{e9}", "ete"), ("ab", "ba")];
    for (a, b) in pairs {
        let ratio = sequence_ratio(a, b);
        assert!((0.0..=1.0).contains(&ratio), "{a} vs {b} gave {ratio}");
    }
}
