//! Text normalization for prompts and asset filenames.
//! Produces the comparison key shared by every matching strategy.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

use crate::services::config::DEFAULT_NOISE_SUFFIXES;

/// Anything that survives transliteration but is not a word character or separator.
static RE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s_]").expect("Invalid regex"));

/// Whitespace and underscore runs.
static RE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("Invalid regex"));

static RE_HEX_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9a-f]{6,}").expect("Invalid regex"));

/// Leading integer of a raw string, e.g. `12` in `"12. A cat"` or `"012_cat.png"`.
static RE_LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^a-zA-Z0-9]*([0-9]{1,9})(?:[^a-zA-Z0-9]|$)").expect("Invalid regex"));

/// UUID groups split by `_` or spaces survive as five separate tokens.
const UUID_GROUP_LENS: [usize; 5] = [8, 4, 4, 4, 12];

/// Hex-only tokens this long are dropped even without digits.
const LONG_HEX_LEN: usize = 12;

/// Normalize text with the default parameter-suffix denylist.
pub fn normalize(text: &str) -> String {
    normalize_with(text, DEFAULT_NOISE_SUFFIXES)
}

/// Normalize text into a comparison key.
///
/// Pipeline:
/// 1. Transliterate to ASCII (folds curly quotes and apostrophe variants), lowercase
/// 2. Delete punctuation outright (`don't` → `dont`, `16:9` → `169`)
/// 3. Split on whitespace/underscore runs, drop UUID token windows, then
///    delete identifier-like hex runs (6+ hex chars holding a digit, or 12+)
/// 4. Drop UUID windows and denylisted suffix sequences until stable
/// 5. Join with `_`
///
/// Idempotent: `normalize_with(normalize_with(x, d), d) == normalize_with(x, d)`.
pub fn normalize_with<S: AsRef<str>>(text: &str, noise_suffixes: &[S]) -> String {
    let mut tokens = strip_identifiers(tokenize(text));

    let denylist: Vec<Vec<String>> = noise_suffixes
        .iter()
        .map(|suffix| {
            strip_identifiers(tokenize(suffix.as_ref()))
        })
        .filter(|seq| !seq.is_empty())
        .collect();

    loop {
        let before = tokens.len();
        remove_uuid_windows(&mut tokens);
        for seq in &denylist {
            remove_sequence(&mut tokens, seq);
        }
        if tokens.len() == before {
            break;
        }
    }

    tokens.join("_")
}

/// Steps 1-2 plus splitting. Tokens are never empty.
fn tokenize(text: &str) -> Vec<String> {
    let lower = deunicode(text).to_lowercase();
    let clean = RE_PUNCTUATION.replace_all(&lower, "");
    RE_SEPARATORS
        .split(&clean)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}

fn strip_identifiers(mut tokens: Vec<String>) -> Vec<String> {
    remove_uuid_windows(&mut tokens);
    tokens
        .into_iter()
        .map(|token| {
            RE_HEX_RUN
                .replace_all(&token, |caps: &regex::Captures| {
                    if is_identifier_run(&caps[0]) {
                        String::new()
                    } else {
                        caps[0].to_string()
                    }
                })
                .into_owned()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Generator-injected hex identifier: a digit-bearing run, or one too long to be a word.
pub(crate) fn is_identifier_run(run: &str) -> bool {
    run.len() >= LONG_HEX_LEN || run.chars().any(|c| c.is_ascii_digit())
}

fn is_hex(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_hexdigit())
}

fn remove_uuid_windows(tokens: &mut Vec<String>) {
    let mut i = 0;
    while i + UUID_GROUP_LENS.len() <= tokens.len() {
        let is_uuid = tokens[i..i + UUID_GROUP_LENS.len()]
            .iter()
            .zip(UUID_GROUP_LENS)
            .all(|(token, len)| token.len() == len && is_hex(token));
        if is_uuid {
            tokens.drain(i..i + UUID_GROUP_LENS.len());
        } else {
            i += 1;
        }
    }
}

fn remove_sequence(tokens: &mut Vec<String>, seq: &[String]) {
    let mut i = 0;
    while i + seq.len() <= tokens.len() {
        if tokens[i..i + seq.len()] == *seq {
            tokens.drain(i..i + seq.len());
        } else {
            i += 1;
        }
    }
}

/// Extract the leading integer token of a raw prompt or filename stem.
pub fn leading_numeric_id(raw: &str) -> Option<u64> {
    RE_LEADING_NUMBER
        .captures(raw.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
