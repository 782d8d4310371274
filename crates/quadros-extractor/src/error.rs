//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during segmentation or extraction
///
/// Per-fragment failures are not errors: they are reported as
/// `ExtractionResult` variants. These errors cover setup problems and the
/// parser's internal rejection reasons.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Invalid structure in the LLM response
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A segmentation pattern failed to compile
    #[error("Segmenter error: {0}")]
    Segmenter(#[from] regex::Error),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
