//! Output formatting for the CLI.

use colored::*;
use quadros_domain::{ExtractionOutcome, ExtractionResult};
use quadros_extractor::{ExtractionMetadata, ExtractionProgress};
use quadros_report::Reports;
use std::path::PathBuf;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format one progress line for a finished fragment.
    pub fn progress(&self, outcome: &ExtractionOutcome, progress: &ExtractionProgress) -> String {
        let counts = format!(
            "[{}/{}] {} ok, {} failed",
            progress.processed,
            progress.total,
            progress.succeeded + progress.empty,
            progress.failed()
        );

        let detail = match &outcome.result {
            ExtractionResult::Success(records) if records.is_empty() => {
                self.colorize(&format!("fragment {}: no decree", outcome.ordinal), "yellow")
            }
            ExtractionResult::Success(records) => self.colorize(
                &format!("fragment {}: {} decree(s)", outcome.ordinal, records.len()),
                "green",
            ),
            ExtractionResult::MalformedResponse { .. } => {
                self.colorize(&format!("fragment {}: malformed reply", outcome.ordinal), "red")
            }
            ExtractionResult::TransportFailure(_) => {
                self.colorize(&format!("fragment {}: call failed", outcome.ordinal), "red")
            }
        };

        format!("{} {}", counts, detail)
    }

    /// Format the per-table summary.
    pub fn report_table(&self, reports: &Reports, files: &[PathBuf]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Table", "Rows", "File"]);

        for (idx, table) in reports.tables().iter().enumerate() {
            let file = files
                .get(idx)
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            builder.push_record([table.name().to_string(), table.len().to_string(), file]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the end-of-run status line.
    pub fn run_summary(&self, progress: &ExtractionProgress, metadata: &ExtractionMetadata) -> String {
        let message = format!(
            "Processed {} fragment(s) with {} in {:.1}s: {} with decrees, {} empty, {} malformed, {} failed calls",
            progress.processed,
            metadata.model_name,
            metadata.processing_time_ms as f64 / 1000.0,
            progress.succeeded,
            progress.empty,
            progress.malformed,
            progress.transport_failures
        );

        if progress.failed() > 0 {
            self.warning(&message)
        } else {
            self.success(&message)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadros_report::reconcile;

    #[test]
    fn test_progress_line() {
        let formatter = Formatter::new(false);
        let mut progress = ExtractionProgress::new(3);
        let outcome = ExtractionOutcome::new(2, ExtractionResult::TransportFailure("x".into()));
        progress.record(&outcome.result);

        assert_eq!(
            formatter.progress(&outcome, &progress),
            "[1/3] 0 ok, 1 failed fragment 2: call failed"
        );
    }

    #[test]
    fn test_report_table_lists_all_tables() {
        let formatter = Formatter::new(false);
        let output = formatter.report_table(&reconcile(&[]), &[]);
        assert!(output.contains("quadro1"));
        assert!(output.contains("quadro2"));
        assert!(output.contains("quadro3"));
        assert!(output.contains("Rows"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
