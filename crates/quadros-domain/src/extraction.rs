//! Extraction module - tagged outcome of one oracle call

use crate::decree::DecreeRecord;

/// Outcome of submitting one fragment to the extraction oracle
///
/// Expected failures are values, not errors: downstream code branches on the
/// tag and never coerces a failure into a record.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    /// The reply parsed; zero records means the oracle judged the fragment
    /// not to be a decree
    Success(Vec<DecreeRecord>),

    /// The oracle replied but the payload did not have the expected shape
    MalformedResponse {
        /// Raw reply text, kept for diagnostics
        raw: String,
        /// Why the payload was rejected
        reason: String,
    },

    /// The call itself failed (network, service error, timeout)
    TransportFailure(String),
}

impl ExtractionResult {
    /// Whether the call produced a usable reply
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    /// Records extracted, empty for failures
    pub fn records(&self) -> &[DecreeRecord] {
        match self {
            ExtractionResult::Success(records) => records,
            _ => &[],
        }
    }

    /// Short label for logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionResult::Success(records) if records.is_empty() => "empty",
            ExtractionResult::Success(_) => "success",
            ExtractionResult::MalformedResponse { .. } => "malformed",
            ExtractionResult::TransportFailure(_) => "transport_failure",
        }
    }
}

/// An extraction result paired with the ordinal of its fragment
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    /// Ordinal of the fragment this result belongs to
    pub ordinal: usize,

    /// What the oracle call produced
    pub result: ExtractionResult,
}

impl ExtractionOutcome {
    /// Create a new outcome
    pub fn new(ordinal: usize, result: ExtractionResult) -> Self {
        Self { ordinal, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_have_no_records() {
        let malformed = ExtractionResult::MalformedResponse {
            raw: "not json".to_string(),
            reason: "expected value".to_string(),
        };
        assert!(malformed.records().is_empty());
        assert!(!malformed.is_success());
        assert_eq!(malformed.kind(), "malformed");

        let transport = ExtractionResult::TransportFailure("timeout".to_string());
        assert!(transport.records().is_empty());
        assert_eq!(transport.kind(), "transport_failure");
    }

    #[test]
    fn test_empty_success_is_success() {
        let empty = ExtractionResult::Success(Vec::new());
        assert!(empty.is_success());
        assert_eq!(empty.kind(), "empty");
    }
}
