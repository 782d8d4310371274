//! Quadros CLI library.
//!
//! This library provides the core functionality for the Quadros command-line
//! interface: configuration, the extraction pipeline and output formatting.

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;

pub use check::{check_connection, CONNECTION_CHECK_PROMPT};
pub use cli::Cli;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use pipeline::{read_corpus, Pipeline, PipelineSummary};
