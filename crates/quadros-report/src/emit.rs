//! CSV output for report tables

use crate::error::ReportError;
use crate::reconcile::Reports;
use crate::table::Table;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// UTF-8 byte order mark, so spreadsheet tools detect the encoding
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const DELIMITER: u8 = b';';

/// Writes report tables as `;`-delimited CSV files
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    prefix: String,
}

impl ReportWriter {
    /// Write into `output_dir` with no file name prefix
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to every file name
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the table will be written to by [`emit_all`](Self::emit_all)
    pub fn path_for(&self, table: &Table) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.csv", self.prefix, table.name()))
    }

    /// Write one table to `path`
    pub fn emit(&self, table: &Table, path: &Path) -> Result<(), ReportError> {
        let mut file = File::create(path)?;
        file.write_all(UTF8_BOM)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_writer(file);

        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(table.aligned(row))?;
        }
        writer.flush()?;

        info!(
            table = table.name(),
            rows = table.len(),
            path = %path.display(),
            "Wrote report"
        );
        Ok(())
    }

    /// Write all three tables, creating the output directory if needed
    pub fn emit_all(&self, reports: &Reports) -> Result<Vec<PathBuf>, ReportError> {
        fs::create_dir_all(&self.output_dir)?;

        reports
            .tables()
            .into_iter()
            .map(|table| {
                let path = self.path_for(table);
                self.emit(table, &path)?;
                Ok(path)
            })
            .collect()
    }
}
