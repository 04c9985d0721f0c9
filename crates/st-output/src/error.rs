//! Error types for st-output.

use thiserror::Error;

/// Errors that can occur when writing simulation output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Per-agent vectors of the two runs do not line up with the population.
    #[error("{what}: expected {expected} entries, got {got}")]
    Misaligned {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
