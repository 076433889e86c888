use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("No prompts supplied")]
    NoPrompts,
    #[error("No candidate files supplied")]
    NoCandidates,
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Archive error: {0}")]
    Archive(String),
    #[error("Export error: {0}")]
    Export(String),
}

impl MatchError {
    pub fn io(path: impl AsRef<std::path::Path>, error: impl std::fmt::Display) -> Self {
        MatchError::Io {
            path: path.as_ref().display().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for MatchError {
    fn from(error: zip::result::ZipError) -> Self {
        MatchError::Archive(error.to_string())
    }
}

impl From<csv::Error> for MatchError {
    fn from(error: csv::Error) -> Self {
        MatchError::Export(error.to_string())
    }
}

impl Serialize for MatchError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type MatchResult<T> = Result<T, MatchError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
