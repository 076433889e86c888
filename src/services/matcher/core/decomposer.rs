//! Positional filename decomposition: `[prefix_]body[_identifier].ext`.
//!
//! Real generator output is inconsistent, so this never fails: when no split
//! is reliable the whole stem becomes the body.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::services::config::DecomposeConfig;
use crate::types::errors::{MatchError, MatchResult};

static RE_DEFAULT_AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("Invalid regex"));

static RE_UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("Invalid regex"));

static RE_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{12}$")
        .expect("Invalid regex")
});

static RE_HEX_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{6,}$").expect("Invalid regex"));

/// Mixed alphanumeric ids (e.g. `a1B2c3D4`) at least this long count as identifiers.
const MIN_MIXED_ID_LEN: usize = 8;

/// Semantic segments of an asset filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameParts {
    pub prefix: Option<String>,
    pub body: String,
    pub identifier_suffix: Option<String>,
}

/// Tunable split heuristics, one set per dataset convention.
#[derive(Debug, Clone)]
pub struct DecomposeRules {
    pub author_pattern: Regex,
    pub min_segments_for_prefix: usize,
    pub min_prefix_len: usize,
}

impl Default for DecomposeRules {
    fn default() -> Self {
        Self {
            author_pattern: RE_DEFAULT_AUTHOR.clone(),
            min_segments_for_prefix: 3,
            min_prefix_len: 3,
        }
    }
}

impl TryFrom<&DecomposeConfig> for DecomposeRules {
    type Error = MatchError;

    fn try_from(config: &DecomposeConfig) -> MatchResult<Self> {
        let author_pattern = Regex::new(&config.author_pattern).map_err(|e| {
            MatchError::InvalidConfig(format!("decompose.author_pattern is not a regex: {e}"))
        })?;
        Ok(Self {
            author_pattern,
            min_segments_for_prefix: config.min_segments_for_prefix,
            min_prefix_len: config.min_prefix_len,
        })
    }
}

/// Decompose with the default rules.
pub fn decompose(filename: &str) -> FilenameParts {
    decompose_with(filename, &DecomposeRules::default())
}

pub fn decompose_with(filename: &str, rules: &DecomposeRules) -> FilenameParts {
    let stem = file_stem(filename);
    let mut segments: Vec<&str> = RE_UNDERSCORE_RUN
        .split(stem)
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        return FilenameParts {
            prefix: None,
            body: stem.to_string(),
            identifier_suffix: None,
        };
    }

    let identifier_suffix = match segments.last() {
        Some(last) if segments.len() > 1 && looks_like_identifier(last) => {
            let id = last.to_string();
            segments.pop();
            Some(id)
        }
        _ => None,
    };

    let prefix = match segments.first() {
        Some(first)
            if segments.len() >= rules.min_segments_for_prefix.max(2)
                && looks_like_author(first, rules) =>
        {
            let prefix = first.to_string();
            segments.remove(0);
            Some(prefix)
        }
        _ => None,
    };

    FilenameParts {
        prefix,
        body: segments.join("_"),
        identifier_suffix,
    }
}

/// Stem with the identifier suffix (if any) dropped, prefix kept.
pub fn stem_without_identifier(filename: &str, rules: &DecomposeRules) -> String {
    let parts = decompose_with(filename, rules);
    match parts.prefix {
        Some(prefix) if !parts.body.is_empty() => format!("{prefix}_{}", parts.body),
        Some(prefix) => prefix,
        None => parts.body,
    }
}

fn file_stem(filename: &str) -> &str {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

fn looks_like_identifier(segment: &str) -> bool {
    if RE_UUID.is_match(segment) {
        return true;
    }

    if RE_HEX_SEGMENT.is_match(segment)
        && (segment.len() >= 12 || segment.chars().any(|c| c.is_ascii_digit()))
    {
        return true;
    }

    segment.len() >= MIN_MIXED_ID_LEN
        && segment.chars().all(|c| c.is_ascii_alphanumeric())
        && segment.chars().any(|c| c.is_ascii_digit())
        && segment.chars().any(|c| c.is_ascii_alphabetic())
}

fn looks_like_author(segment: &str, rules: &DecomposeRules) -> bool {
    rules.author_pattern.is_match(segment)
        && (segment.chars().count() >= rules.min_prefix_len
            || segment.chars().any(|c| c.is_ascii_digit()))
}

#[cfg(test)]
#[path = "tests/decomposer_tests.rs"]
mod tests;
