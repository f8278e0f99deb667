//! Configuration for the extraction pipeline

use glossa_tabular::ProfileLimits;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Model identifier passed to the provider
    pub model: String,

    /// Maximum model attempts per extraction call
    pub max_attempts: u32,

    /// Base backoff delay between attempts (milliseconds); doubles per
    /// attempt
    pub base_delay_ms: u64,

    /// Timeout for a single model attempt (milliseconds)
    pub attempt_timeout_ms: u64,

    /// Sampling temperature for extraction calls
    pub temperature: f64,

    /// Maximum accepted file size (bytes)
    pub max_file_size_bytes: u64,

    /// Maximum extracted text length (characters)
    pub max_text_length: usize,

    /// Rows inspected per profiling call
    pub max_rows_analyzed: usize,

    /// Distinct sample values retained per column
    pub sample_values_per_column: usize,

    /// Non-empty values handed to the type detector per column
    pub type_detection_sample_size: usize,
}

impl ExtractorConfig {
    /// Get the per-attempt timeout as a Duration
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Get the base backoff delay as a Duration
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Backoff delay after a failed attempt (1-based)
    ///
    /// Doubles per attempt; clamps instead of overflowing for attempt counts
    /// far beyond any sane configuration.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay()
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
    }

    /// Profiling ceilings derived from this configuration
    pub fn profile_limits(&self) -> ProfileLimits {
        ProfileLimits {
            max_rows: self.max_rows_analyzed,
            sample_values: self.sample_values_per_column,
            detection_sample: self.type_detection_sample_size,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.attempt_timeout_ms == 0 {
            return Err("attempt_timeout_ms must be greater than 0".to_string());
        }
        if self.max_file_size_bytes == 0 {
            return Err("max_file_size_bytes must be greater than 0".to_string());
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.max_rows_analyzed == 0 {
            return Err("max_rows_analyzed must be greater than 0".to_string());
        }
        if self.sample_values_per_column == 0 {
            return Err("sample_values_per_column must be greater than 0".to_string());
        }
        if self.type_detection_sample_size == 0 {
            return Err("type_detection_sample_size must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            max_attempts: 3,
            base_delay_ms: 1000,
            attempt_timeout_ms: 30_000,
            temperature: 0.2,
            max_file_size_bytes: 50 * 1024 * 1024,
            max_text_length: 100_000,
            max_rows_analyzed: 1000,
            sample_values_per_column: 8,
            type_detection_sample_size: 100,
        }
    }
}
