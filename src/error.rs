//! Error types for csvstream

use std::io;
use thiserror::Error;

/// Main error type for csvstream operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error occurred while reading the underlying source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid reader configuration (missing or conflicting dialect symbols)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A row carries more fields than the expected column count
    #[error("Malformed row at line {line}: {count} columns found, {expected} expected")]
    MalformedRow {
        line: usize,
        count: usize,
        expected: usize,
    },

    /// Strict mode: an enclosure character appears inside a quoted field
    /// without escape and without a valid closing context, or a quoted field
    /// runs past the end of its physical line
    #[error("Unterminated quote at line {line}, column {column}")]
    UnterminatedQuote { line: usize, column: usize },

    /// Strict mode: the input ended before the row was complete
    #[error("Truncated row at line {line}: {found} of {expected} columns read before end of input")]
    TruncatedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Encoding label could not be resolved
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A row has more values than the header has names
    #[error("Too many columns: header has {expected}, row has {found}")]
    TooManyColumns { expected: usize, found: usize },

    /// No path, string or reader was set before reading
    #[error("No input source set")]
    SourceNotSet,
}

/// Result type alias for csvstream operations
pub type Result<T> = std::result::Result<T, CsvError>;

impl CsvError {
    /// Physical line number the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            CsvError::MalformedRow { line, .. }
            | CsvError::UnterminatedQuote { line, .. }
            | CsvError::TruncatedRow { line, .. } => Some(*line),
            _ => None,
        }
    }
}
