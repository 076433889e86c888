//! Runtime configuration for a matching run.
//!
//! Everything has a default; a JSON file only needs the fields it overrides.

pub mod models;

pub use models::*;

use crate::types::errors::{MatchError, MatchResult};
use regex::Regex;
use std::path::Path;

impl MatchConfig {
    /// Parse a JSON document, filling unspecified fields with defaults.
    pub fn from_json(text: &str) -> MatchResult<Self> {
        let config: MatchConfig = serde_json::from_str(text)
            .map_err(|e| MatchError::InvalidConfig(format!("Malformed config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional path. `None` yields the defaults.
    pub fn load(path: Option<&Path>) -> MatchResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|e| MatchError::io(path, e))?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded match config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> MatchResult<()> {
        check_unit_range("fuzzy_threshold", self.fuzzy_threshold)?;
        check_unit_range("visual.threshold", self.visual.threshold)?;

        if self.visual.frame_size < 8 {
            return Err(MatchError::InvalidConfig(format!(
                "visual.frame_size must be at least 8, got {}",
                self.visual.frame_size
            )));
        }

        if self.scan.extensions.iter().any(|ext| ext.trim().is_empty()) {
            return Err(MatchError::InvalidConfig(
                "scan.extensions contains an empty entry".into(),
            ));
        }

        if self.emit.default_extension.trim().is_empty() {
            return Err(MatchError::InvalidConfig(
                "emit.default_extension must not be empty".into(),
            ));
        }

        Regex::new(&self.decompose.author_pattern).map_err(|e| {
            MatchError::InvalidConfig(format!("decompose.author_pattern is not a regex: {e}"))
        })?;

        Ok(())
    }
}

fn check_unit_range(field: &str, value: f64) -> MatchResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MatchError::InvalidConfig(format!(
            "{field} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
