//! Error types for sweights-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the sweights-io crate.
///
/// Covers file system failures, malformed weights text, and ids that cannot
/// be written in the whitespace-separated format.
#[derive(Debug, thiserror::Error)]
pub enum WeightsIoError {
    /// Returned when a weights file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an operating system I/O failure.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when a line of a weights file cannot be parsed.
    #[error("parse error at line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// Returned when an id or header field contains whitespace or is empty.
    #[error("{what} '{value}' cannot be written: must be non-empty without whitespace")]
    InvalidToken {
        /// Which kind of token was rejected.
        what: &'static str,
        /// The rejected text.
        value: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },
}

impl WeightsIoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}
