//! Configuration management for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use quadros_extractor::ExtractorConfig;
use quadros_llm::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the API key environment variable
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Oracle connection settings
    #[serde(default)]
    pub gemini: GeminiSettings,

    /// Extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputSettings,
}

/// Gemini API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request `application/json` replies
    #[serde(default = "default_true")]
    pub json_mode: bool,
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory for the CSV files
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// File name prefix
    #[serde(default)]
    pub prefix: String,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".quadros").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is read
    /// when present, and built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file {} does not exist",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Ok(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(preset) = cli.preset {
            let schema = self.extractor.response_schema;
            self.extractor = preset.into();
            self.extractor.response_schema = schema;
        }
        if let Some(model) = &cli.model {
            self.gemini.model = model.clone();
        }
        if let Some(endpoint) = &cli.endpoint {
            self.gemini.endpoint = endpoint.clone();
        }
        if let Some(env) = &cli.api_key_env {
            self.gemini.api_key_env = env.clone();
        }
        if let Some(concurrency) = cli.concurrency {
            self.extractor.concurrency = concurrency;
        }
        if let Some(timeout) = cli.timeout {
            self.extractor.extraction_timeout_secs = timeout;
        }
        if let Some(attempts) = cli.max_attempts {
            self.extractor.max_attempts = attempts;
        }
        if let Some(schema) = cli.schema {
            self.extractor.response_schema = schema.into();
        }
        if cli.warn_on_empty {
            self.extractor.warn_on_empty = true;
        }
        if cli.no_source_value_fallback {
            self.extractor.source_value_fallback = false;
        }
        if let Some(dir) = &cli.output_dir {
            self.output.dir = dir.clone();
        }
        if let Some(prefix) = &cli.prefix {
            self.output.prefix = prefix.clone();
        }
        if cli.no_color {
            self.output.color = false;
        }
    }

    /// Validate settings that would otherwise fail mid-run.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        if self.gemini.model.trim().is_empty() {
            return Err(CliError::Config("gemini.model must not be empty".into()));
        }
        Ok(())
    }

    /// Load `KEY=value` pairs into the process environment.
    ///
    /// An explicit file must exist. Without one, `.env` is looked up from the
    /// current directory upwards and skipped when absent. Variables already
    /// set in the environment are not overridden.
    pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
        match path {
            Some(path) => dotenvy::from_path(path)
                .map(|()| Some(path.to_path_buf()))
                .map_err(|e| CliError::Config(format!("Could not load {}: {}", path.display(), e))),
            None => match dotenvy::dotenv() {
                Ok(path) => Ok(Some(path)),
                Err(e) if e.not_found() => Ok(None),
                Err(e) => Err(CliError::Config(format!("Could not load .env: {}", e))),
            },
        }
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        let name = &self.gemini.api_key_env;
        match std::env::var(name) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CliError::MissingCredential(name.clone())),
        }
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            json_mode: true,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            prefix: String::new(),
            color: true,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}
