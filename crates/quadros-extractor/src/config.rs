//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shape of the JSON object the oracle is asked to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSchema {
    /// Root key `"decretos"`, one nested object per decree
    #[default]
    Decretos,
    /// Root keys `"quadro1"`, `"quadro2"`, `"quadro3"`, one flat list per report
    Quadros,
}

impl ResponseSchema {
    /// Top-level key that must be present in the reply
    pub fn required_key(&self) -> &'static str {
        match self {
            ResponseSchema::Decretos => "decretos",
            ResponseSchema::Quadros => "quadro1",
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Reply shape requested from the oracle
    pub response_schema: ResponseSchema,

    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Maximum number of extraction calls in flight
    pub concurrency: usize,

    /// Attempts per fragment for transport failures (1 = no retry)
    pub max_attempts: u32,

    /// Base delay before the first retry, doubled on each further retry
    pub retry_backoff_ms: u64,

    /// Log fragments that decode to zero records as warnings
    pub warn_on_empty: bool,

    /// Use the decree total for sources the document does not itemize
    pub source_value_fallback: bool,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Delay before retry number `retry` (1-based): base, 2x base, 4x base...
    pub fn retry_delay(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry.saturating_sub(1));
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Sequential, single-attempt processing
    fn default() -> Self {
        Self {
            response_schema: ResponseSchema::Decretos,
            extraction_timeout_secs: 120,
            concurrency: 1,
            max_attempts: 1,
            retry_backoff_ms: 1_000,
            warn_on_empty: false,
            source_value_fallback: true,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: parallel calls, shorter timeouts, one retry
    pub fn aggressive() -> Self {
        Self {
            extraction_timeout_secs: 60,
            concurrency: 4,
            max_attempts: 2,
            ..Self::default()
        }
    }

    /// Lenient preset: longer timeouts and more retries, still sequential
    pub fn lenient() -> Self {
        Self {
            extraction_timeout_secs: 300,
            max_attempts: 3,
            warn_on_empty: true,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_aggressive_config_is_valid() {
        let config = ExtractorConfig::aggressive();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lenient_config_is_valid() {
        let config = ExtractorConfig::lenient();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_concurrency() {
        let mut config = ExtractorConfig::default();
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ExtractorConfig::default();
        config.extraction_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_delay_doubles() {
        let config = ExtractorConfig::default();
        assert_eq!(config.retry_delay(1), Duration::from_secs(1));
        assert_eq!(config.retry_delay(2), Duration::from_secs(2));
        assert_eq!(config.retry_delay(3), Duration::from_secs(4));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::aggressive();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.concurrency, parsed.concurrency);
        assert_eq!(config.max_attempts, parsed.max_attempts);
        assert_eq!(config.extraction_timeout_secs, parsed.extraction_timeout_secs);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("response_schema = \"quadros\"\n").unwrap();
        assert_eq!(parsed.response_schema, ResponseSchema::Quadros);
        assert_eq!(parsed.extraction_timeout_secs, 120);
        assert!(parsed.source_value_fallback);
    }
}
