//! End-to-end run: corpus to CSV reports.

use crate::error::{CliError, Result};
use quadros_domain::traits::LlmProvider;
use quadros_domain::ExtractionOutcome;
use quadros_extractor::{
    ExtractionMetadata, ExtractionProgress, Extractor, ExtractorConfig, ExtractorError, Segmenter,
    StopHandle,
};
use quadros_report::{reconcile, ReportWriter, Reports};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a pipeline run produced
#[derive(Debug)]
pub struct PipelineSummary {
    /// Admissible fragments sent to the oracle
    pub fragments: usize,
    /// Outcome tally
    pub progress: ExtractionProgress,
    /// Run metadata
    pub metadata: ExtractionMetadata,
    /// The three report tables
    pub reports: Reports,
    /// Files written, in table order
    pub files: Vec<PathBuf>,
    /// Stopped early; the reports cover the fragments submitted before the stop
    pub interrupted: bool,
}

/// Segments a corpus, extracts each fragment, reconciles and writes reports
pub struct Pipeline<L>
where
    L: LlmProvider,
{
    segmenter: Segmenter,
    extractor: Extractor<L>,
    writer: ReportWriter,
}

impl<L> Pipeline<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: std::fmt::Display,
{
    /// Build a pipeline around an oracle client
    pub fn new(llm: L, config: ExtractorConfig, writer: ReportWriter) -> Result<Self> {
        config.validate().map_err(ExtractorError::Config)?;

        Ok(Self {
            segmenter: Segmenter::new()?,
            extractor: Extractor::new(llm, config),
            writer,
        })
    }

    /// Handle that stops submitting fragments; reports are still written
    /// from the outcomes gathered so far
    pub fn stop_handle(&self) -> StopHandle {
        self.extractor.stop_handle()
    }

    /// Run on a corpus file
    pub async fn run_file<F>(&self, path: &Path, on_outcome: F) -> Result<PipelineSummary>
    where
        F: FnMut(&ExtractionOutcome, &ExtractionProgress),
    {
        let corpus = read_corpus(path)?;
        self.run(&corpus, on_outcome).await
    }

    /// Run on corpus text
    pub async fn run<F>(&self, corpus: &str, on_outcome: F) -> Result<PipelineSummary>
    where
        F: FnMut(&ExtractionOutcome, &ExtractionProgress),
    {
        let fragments = self.segmenter.segment(corpus);
        let fragment_count = fragments.len();

        let run = self
            .extractor
            .extract_all_with_progress(fragments, on_outcome)
            .await;

        let reports = reconcile(&run.outcomes);
        let files = self.writer.emit_all(&reports)?;

        info!(
            quadro1 = reports.summary.len(),
            quadro2 = reports.by_source.len(),
            quadro3 = reports.funding_codes.len(),
            "Reports written to {}",
            self.writer.output_dir().display()
        );

        Ok(PipelineSummary {
            fragments: fragment_count,
            progress: run.progress,
            metadata: run.metadata,
            reports,
            files,
            interrupted: run.interrupted,
        })
    }
}

/// Read the corpus, failing with `InputNotFound` before anything else runs
pub fn read_corpus(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CliError::InputNotFound(path.to_path_buf()));
    }
    let corpus = fs::read_to_string(path)?;
    info!(path = %path.display(), bytes = corpus.len(), "Read corpus");
    Ok(corpus)
}
