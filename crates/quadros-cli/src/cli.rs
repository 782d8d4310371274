//! CLI argument parsing.

use clap::{Parser, ValueEnum};
use quadros_extractor::{ExtractorConfig, ResponseSchema};
use std::path::PathBuf;

/// Quadros - Extract additional-credit tables from municipal budget decrees.
#[derive(Debug, Parser)]
#[command(name = "quadros")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Decree corpus (UTF-8 text file)
    #[arg(required_unless_present = "check")]
    pub input: Option<PathBuf>,

    /// Only check that the oracle answers, then exit
    #[arg(long)]
    pub check: bool,

    /// Environment file to load before reading the API key (default: ./.env if present)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Configuration file path (default: ~/.quadros/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the CSV reports
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix for report file names
    #[arg(long)]
    pub prefix: Option<String>,

    /// Gemini model name
    #[arg(short, long, env = "QUADROS_MODEL")]
    pub model: Option<String>,

    /// Generative Language API endpoint
    #[arg(long, env = "QUADROS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    #[arg(long)]
    pub api_key_env: Option<String>,

    /// Extractor preset applied before other extractor flags
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Maximum number of oracle calls in flight
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Per-call timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Attempts per fragment on transport failure
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Reply shape requested from the oracle
    #[arg(long, value_enum)]
    pub schema: Option<SchemaArg>,

    /// Log fragments with no decree as warnings
    #[arg(long)]
    pub warn_on_empty: bool,

    /// Leave unitemized source values empty instead of using the decree total
    #[arg(long)]
    pub no_source_value_fallback: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Extractor presets.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Preset {
    /// Sequential, single attempt
    Default,
    /// Parallel calls, shorter timeouts, one retry
    Aggressive,
    /// Longer timeouts, more retries
    Lenient,
}

impl From<Preset> for ExtractorConfig {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Default => ExtractorConfig::default(),
            Preset::Aggressive => ExtractorConfig::aggressive(),
            Preset::Lenient => ExtractorConfig::lenient(),
        }
    }
}

/// Response schema options.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaArg {
    /// `{"decretos": [...]}` with nested sources
    Decretos,
    /// `{"quadro1": [...], "quadro2": [...], "quadro3": [...]}`
    Quadros,
}

impl From<SchemaArg> for ResponseSchema {
    fn from(schema: SchemaArg) -> Self {
        match schema {
            SchemaArg::Decretos => ResponseSchema::Decretos,
            SchemaArg::Quadros => ResponseSchema::Quadros,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["quadros", "corpus.txt"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("corpus.txt")));
        assert!(!cli.check);
        assert_eq!(cli.verbose, 0);
        assert!(cli.schema.is_none());
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "quadros", "corpus.txt", "-j", "4", "--schema", "quadros", "--preset", "lenient", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.concurrency, Some(4));
        assert!(matches!(cli.schema, Some(SchemaArg::Quadros)));
        assert!(matches!(cli.preset, Some(Preset::Lenient)));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["quadros"]).is_err());
    }

    #[test]
    fn test_check_needs_no_input() {
        let cli = Cli::try_parse_from(["quadros", "--check", "--env-file", "local.env"]).unwrap();
        assert!(cli.check);
        assert!(cli.input.is_none());
        assert_eq!(cli.env_file, Some(PathBuf::from("local.env")));
    }
}
