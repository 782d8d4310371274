//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::parser::{parse_llm_response, ParseOptions};
use crate::prompt::PromptBuilder;
use crate::types::{ExtractionMetadata, ExtractionProgress, ExtractionRun, StopHandle};
use futures::future;
use futures::stream::{self, StreamExt};
use quadros_domain::traits::LlmProvider;
use quadros_domain::{ExtractionOutcome, ExtractionResult, Fragment};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Extractor turns decree fragments into structured records
///
/// `extract` makes exactly one oracle call, bounded by the configured
/// timeout. `extract_all` retries transport failures with exponential
/// backoff up to `max_attempts`. Malformed replies are never retried.
///
/// Once its [`StopHandle`] is triggered, `extract_all` submits no further
/// fragments and makes no further retries. Calls already in flight are left
/// to complete or time out.
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
    attempts: AtomicUsize,
    stop: StopHandle,
}

impl<L> Extractor<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            config,
            attempts: AtomicUsize::new(0),
            stop: StopHandle::default(),
        }
    }

    /// Handle that stops batch submission, e.g. on user interrupt
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Oracle calls made so far, retries included
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Extract records from a single fragment with one oracle call
    pub async fn extract(&self, fragment: &Fragment) -> ExtractionResult {
        let prompt = self.prompt_for(fragment);
        self.call_once(fragment.ordinal, &prompt).await
    }

    /// Extract a fragment, retrying transport failures up to `max_attempts`
    async fn extract_with_retry(&self, fragment: &Fragment) -> ExtractionResult {
        let prompt = self.prompt_for(fragment);
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = self.call_once(fragment.ordinal, &prompt).await;
            match result {
                ExtractionResult::TransportFailure(ref reason)
                    if attempt < max_attempts && !self.stop.is_stopped() =>
                {
                    let delay = self.config.retry_delay(attempt);
                    warn!(
                        fragment = fragment.ordinal,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Oracle call failed, retrying: {}",
                        reason
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    fn prompt_for(&self, fragment: &Fragment) -> String {
        let prompt = PromptBuilder::new(&fragment.text, self.config.response_schema).build();
        debug!(fragment = fragment.ordinal, "Prompt length: {} chars", prompt.len());
        prompt
    }

    /// One oracle call under the timeout, then parsing
    async fn call_once(&self, ordinal: usize, prompt: &str) -> ExtractionResult {
        self.attempts.fetch_add(1, Ordering::Relaxed);

        let response = match timeout(
            self.config.extraction_timeout(),
            self.llm_provider.generate(prompt),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return ExtractionResult::TransportFailure(e.to_string()),
            Err(_) => {
                return ExtractionResult::TransportFailure(format!(
                    "Timed out after {}s",
                    self.config.extraction_timeout_secs
                ))
            }
        };

        debug!(fragment = ordinal, "LLM response length: {} chars", response.len());

        let options = ParseOptions {
            schema: self.config.response_schema,
            source_value_fallback: self.config.source_value_fallback,
        };

        match parse_llm_response(&response, options) {
            Ok(records) => ExtractionResult::Success(records),
            Err(e) => ExtractionResult::MalformedResponse {
                raw: response,
                reason: e.to_string(),
            },
        }
    }

    /// Extract every fragment, keeping fragment order in the output
    pub async fn extract_all(&self, fragments: Vec<Fragment>) -> ExtractionRun {
        self.extract_all_with_progress(fragments, |_, _| {}).await
    }

    /// Extract every fragment, reporting each outcome as it completes
    ///
    /// At most `concurrency` calls are in flight. Outcomes are delivered to
    /// `on_outcome` and returned in fragment order regardless of which call
    /// finishes first. After a stop, the run ends with the outcomes of the
    /// fragments already submitted.
    pub async fn extract_all_with_progress<F>(
        &self,
        fragments: Vec<Fragment>,
        mut on_outcome: F,
    ) -> ExtractionRun
    where
        F: FnMut(&ExtractionOutcome, &ExtractionProgress),
    {
        let start_time = Instant::now();
        let attempts_before = self.attempts();
        let concurrency = self.config.concurrency.max(1);
        let mut progress = ExtractionProgress::new(fragments.len());

        info!(
            fragments = fragments.len(),
            concurrency,
            model = self.llm_provider.model_name(),
            "Starting extraction"
        );

        let mut outcomes = Vec::with_capacity(fragments.len());
        let stop = self.stop.clone();
        let mut results = stream::iter(fragments.iter())
            .take_while(|_| future::ready(!stop.is_stopped()))
            .map(|fragment| async move {
                ExtractionOutcome::new(fragment.ordinal, self.extract_with_retry(fragment).await)
            })
            .buffered(concurrency);

        while let Some(outcome) = results.next().await {
            progress.record(&outcome.result);
            self.log_outcome(&outcome, &progress);
            on_outcome(&outcome, &progress);
            outcomes.push(outcome);
        }

        let metadata = ExtractionMetadata {
            model_name: self.llm_provider.model_name().to_string(),
            attempts: self.attempts() - attempts_before,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        let interrupted = self.stop.is_stopped();
        if progress.unprocessed() > 0 {
            warn!(
                submitted = progress.processed,
                skipped = progress.unprocessed(),
                "Extraction stopped before every fragment was submitted"
            );
        }

        info!(
            "Extraction complete: {} with records, {} empty, {} malformed, {} transport failures",
            progress.succeeded, progress.empty, progress.malformed, progress.transport_failures
        );

        ExtractionRun {
            outcomes,
            progress,
            metadata,
            interrupted,
        }
    }

    fn log_outcome(&self, outcome: &ExtractionOutcome, progress: &ExtractionProgress) {
        let ordinal = outcome.ordinal;
        let done = progress.processed;
        let total = progress.total;

        match &outcome.result {
            ExtractionResult::Success(records) if records.is_empty() => {
                if self.config.warn_on_empty {
                    warn!(fragment = ordinal, done, total, "Fragment yielded no decree");
                } else {
                    debug!(fragment = ordinal, done, total, "Fragment yielded no decree");
                }
            }
            ExtractionResult::Success(records) => {
                info!(fragment = ordinal, done, total, "Fragment yielded {} decree(s)", records.len());
            }
            ExtractionResult::MalformedResponse { raw, reason } => {
                warn!(fragment = ordinal, done, total, raw = %raw, "Malformed oracle reply: {}", reason);
            }
            ExtractionResult::TransportFailure(reason) => {
                warn!(fragment = ordinal, done, total, "Oracle call failed: {}", reason);
            }
        }
    }
}
