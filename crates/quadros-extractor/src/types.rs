//! Run-level types for batch extraction

use quadros_domain::{ExtractionOutcome, ExtractionResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Running tally of fragment outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionProgress {
    /// Fragments submitted
    pub total: usize,

    /// Fragments with a final outcome
    pub processed: usize,

    /// Replies that decoded to at least one record
    pub succeeded: usize,

    /// Replies that decoded to zero records
    pub empty: usize,

    /// Replies rejected by the parser
    pub malformed: usize,

    /// Calls that failed or timed out after every attempt
    pub transport_failures: usize,
}

impl ExtractionProgress {
    /// Start a tally for `total` fragments
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Count one final outcome
    pub fn record(&mut self, result: &ExtractionResult) {
        self.processed += 1;
        match result {
            ExtractionResult::Success(records) if records.is_empty() => self.empty += 1,
            ExtractionResult::Success(_) => self.succeeded += 1,
            ExtractionResult::MalformedResponse { .. } => self.malformed += 1,
            ExtractionResult::TransportFailure(_) => self.transport_failures += 1,
        }
    }

    /// Fragments that produced no usable reply
    pub fn failed(&self) -> usize {
        self.malformed + self.transport_failures
    }

    /// Fragments never submitted because the run was stopped
    pub fn unprocessed(&self) -> usize {
        self.total.saturating_sub(self.processed)
    }
}

/// Asks a running batch to stop submitting fragments
///
/// Calls already in flight are not cancelled; they finish or hit the
/// extraction timeout, and their outcomes are kept.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request the stop
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Metadata about a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Model reported by the provider
    pub model_name: String,

    /// Oracle calls made, retries included
    pub attempts: usize,

    /// Wall-clock duration of the run
    pub processing_time_ms: u64,

    /// Unix timestamp at the end of the run
    pub timestamp: u64,
}

/// Result of extracting every fragment of a corpus
#[derive(Debug, Clone)]
pub struct ExtractionRun {
    /// One outcome per fragment, in ordinal order
    pub outcomes: Vec<ExtractionOutcome>,

    /// Outcome tally
    pub progress: ExtractionProgress,

    /// Run metadata
    pub metadata: ExtractionMetadata,

    /// A stop was requested during the run
    pub interrupted: bool,
}

impl ExtractionRun {
    /// Total number of decree records across successful outcomes
    pub fn record_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.result.records().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts_each_kind() {
        let mut progress = ExtractionProgress::new(4);
        progress.record(&ExtractionResult::Success(vec![]));
        progress.record(&ExtractionResult::MalformedResponse {
            raw: String::new(),
            reason: "bad".to_string(),
        });
        progress.record(&ExtractionResult::TransportFailure("timeout".to_string()));

        assert_eq!(progress.total, 4);
        assert_eq!(progress.processed, 3);
        assert_eq!(progress.empty, 1);
        assert_eq!(progress.succeeded, 0);
        assert_eq!(progress.failed(), 2);
        assert_eq!(progress.unprocessed(), 1);
    }

    #[test]
    fn test_stop_handle_shared_between_clones() {
        let handle = StopHandle::default();
        let clone = handle.clone();
        assert!(!handle.is_stopped());

        clone.stop();
        assert!(handle.is_stopped());
    }
}
