//! Error types for report output

use thiserror::Error;

/// Errors that can occur while writing reports
#[derive(Error, Debug)]
pub enum ReportError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
