//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
///
/// Every variant is fatal: per-fragment failures never surface here.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API key environment variable is missing or blank
    #[error("Configuration error: environment variable {0} is not set")]
    MissingCredential(String),

    /// The corpus file does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Extractor setup error
    #[error("Extractor error: {0}")]
    Extractor(#[from] quadros_extractor::ExtractorError),

    /// Report output error
    #[error("Report error: {0}")]
    Report(#[from] quadros_report::ReportError),

    /// The connectivity check got no reply
    #[error("Connection check failed: {0}")]
    Connection(String),

    /// LLM client setup error
    #[error("LLM error: {0}")]
    Llm(#[from] quadros_llm::LlmError),

    /// Stopped by Ctrl+C
    ///
    /// Raised after the run: fragments submitted before the interrupt were
    /// allowed to finish or time out, and the reports written cover only them.
    #[error("Interrupted; reports cover only the fragments extracted before the stop")]
    Interrupted,
}
