/// Error types for the ingestion pipeline
use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline failures.
///
/// Unresolved state keys and zero-denominator averages are not errors: the
/// loaders log and resolve them in place.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required input file is missing or unreadable
    #[error("cannot open source {}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record carries a required value that cannot be parsed
    #[error("malformed record in {} at line {line}: {reason}", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// CSV reader or writer failure not tied to one record
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to write an output artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a chart or config document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, line: u64, reason: impl Into<String>) -> Self {
        PipelineError::MalformedRecord {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Maps a CSV deserialize failure onto the record it happened at.
    pub(crate) fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        match err.position().map(|pos| pos.line()) {
            Some(line) => PipelineError::malformed(path, line, err.to_string()),
            None => PipelineError::Csv(err),
        }
    }
}

/// Type alias for Results using PipelineError
pub type Result<T> = std::result::Result<T, PipelineError>;
