use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::errors::ConfigError;
use crate::language_utils;
use crate::translation::retry::RetryPolicy;

/// Application configuration module
/// This module handles the application configuration including loading
/// and validating configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Catalog to read (.po / .pot)
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Text file the translations are written to
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Worker pool and error policy
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Retry settings for transient failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Full URL of the translate endpoint
    #[serde(default = "default_service_url")]
    pub url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Texts longer than this many characters are truncated before sending
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_service_url(),
            timeout_secs: default_timeout_secs(),
            max_text_length: default_max_text_length(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// What to do with entries that failed under continue-on-error
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailedEntryPolicy {
    /// Leave failed entries out of the output file
    #[default]
    Omit,
    /// Write failed entries with an `<ERROR>` translation
    Placeholder,
}

/// Worker pool configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bound of the pending job queue, defaults to twice the worker count
    #[serde(default)]
    pub queue_capacity: Option<usize>,

    /// Keep translating after a failed entry instead of aborting the run
    #[serde(default)]
    pub continue_on_error: bool,

    /// Output policy for failed entries
    #[serde(default)]
    pub failed_entries: FailedEntryPolicy,

    /// Show a progress bar instead of periodic log lines
    #[serde(default = "default_true")]
    pub progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: None,
            continue_on_error: false,
            failed_entries: FailedEntryPolicy::default(),
            progress: true,
        }
    }
}

impl PipelineConfig {
    /// Queue bound actually used by the scheduler
    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(self.workers.max(1) * 2)
    }
}

/// Retry configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Total attempts per entry, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, doubled for each following one
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Upper bound for a single backoff delay
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_max_ms),
        )
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("messages.po")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("traducciones_es.txt")
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "es".to_string()
}

fn default_service_url() -> String {
    // LibreTranslate started locally
    "http://localhost:5000/translate".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_text_length() -> usize {
    5000
}

fn default_workers() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    500 // doubled on each retry
}

fn default_backoff_max_ms() -> u64 {
    8000
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file, or the defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        language_utils::validate_language_code(&self.source_language)?;
        language_utils::validate_language_code(&self.target_language)?;

        let url = Url::parse(&self.service.url).map_err(|e| ConfigError::Url {
            url: self.service.url.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Url {
                url: self.service.url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if self.service.timeout_secs == 0 {
            return Err(ConfigError::Value {
                field: "service.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.service.max_text_length == 0 {
            return Err(ConfigError::Value {
                field: "service.max_text_length",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.pipeline.workers == 0 {
            return Err(ConfigError::Value {
                field: "pipeline.workers",
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.pipeline.queue_capacity == Some(0) {
            return Err(ConfigError::Value {
                field: "pipeline.queue_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Value {
                field: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: default_input_path(),
            output_path: default_output_path(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            service: ServiceConfig::default(),
            pipeline: PipelineConfig::default(),
            retry: RetryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
