use log::{debug, error, info};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::catalog;
use crate::errors::{AppError, ConfigError};
use crate::language_utils;
use crate::output_writer::{OutputWriter, WriteStatus};
use crate::providers::libretranslate::LibreTranslate;
use crate::providers::Provider;
use crate::translation::{
    CancelFlag, ProgressMode, ProgressReporter, ResultCollector, RunResult, SchedulerOptions,
    WorkScheduler,
};

// @module: Application controller for catalog translation

/// Main application controller: parse, translate, collect, write
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translation backend shared by all workers
    provider: Arc<dyn Provider>,
}

impl Controller {
    // @method: Create a controller talking to the configured LibreTranslate endpoint
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;

        let provider = LibreTranslate::new(config.service.url.clone(), config.service.timeout())
            .map_err(|e| ConfigError::Url {
                url: config.service.url.clone(),
                reason: e.to_string(),
            })?
            .with_max_text_length(config.service.max_text_length);

        Ok(Self {
            config,
            provider: Arc::new(provider),
        })
    }

    // @method: Create a controller with an injected provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline once
    ///
    /// The summary is logged for every run that got past parsing. An aborted
    /// run returns [`AppError::Aborted`] and leaves the output file untouched.
    pub async fn run(&self) -> Result<RunResult, AppError> {
        let start_time = Instant::now();
        let config = &self.config;

        info!("Reading catalog {}", config.input_path.display());
        let entries = catalog::parse_catalog(&config.input_path)?;
        let total = entries.len();

        info!(
            "Translating {} entries from {} to {} with {} workers",
            total,
            Self::language_label(&config.source_language),
            Self::language_label(&config.target_language),
            config.pipeline.workers
        );
        debug!("Translation service: {}", config.service.url);

        let cancel = CancelFlag::new();
        let (progress, progress_handle) = ProgressReporter::spawn(total, self.progress_mode(total));

        let scheduler = WorkScheduler::new(
            Arc::clone(&self.provider),
            config.retry.to_policy(),
            SchedulerOptions {
                workers: config.pipeline.workers,
                queue_capacity: config.pipeline.effective_queue_capacity(),
                call_timeout: config.service.timeout(),
            },
        );
        let stream = scheduler.run(entries, &config.source_language, &config.target_language, cancel.clone());

        let result = ResultCollector::new(total, config.pipeline.continue_on_error, cancel)
            .with_progress(progress)
            .collect(stream)
            .await;
        progress_handle.finish().await;

        Self::log_summary(&result);

        match OutputWriter::new(config.pipeline.failed_entries).write(&config.output_path, &result)? {
            WriteStatus::Written { records } => {
                info!("Success: {} ({} records)", config.output_path.display(), records);
            }
            WriteStatus::SkippedAborted => {
                if let Some(reason) = result.aborted() {
                    return Err(AppError::Aborted {
                        index: reason.index,
                        text: reason.source_text.clone(),
                        kind: reason.error_kind,
                        detail: reason.error_detail.clone(),
                    });
                }
            }
        }

        info!("Finished in {}", Self::format_duration(start_time.elapsed()));
        Ok(result)
    }

    fn progress_mode(&self, total: usize) -> ProgressMode {
        if !self.config.pipeline.progress {
            ProgressMode::Silent
        } else if std::io::stderr().is_terminal() {
            ProgressMode::Bar
        } else {
            ProgressMode::Log { every: (total / 10).max(1) }
        }
    }

    fn language_label(code: &str) -> String {
        match language_utils::get_language_name(code) {
            Ok(name) => format!("{} ({})", name, code),
            Err(_) => code.to_string(),
        }
    }

    fn log_summary(result: &RunResult) {
        let summary = result.summary();
        info!(
            "Summary: {} entries, {} succeeded, {} failed, {} skipped (empty), {} cancelled, {} not attempted in {}",
            summary.total,
            summary.succeeded,
            summary.failed,
            summary.skipped_empty,
            summary.cancelled,
            summary.not_attempted,
            Self::format_duration(result.elapsed())
        );
        if let Some(reason) = result.aborted() {
            error!(
                "Run aborted at entry {} ({:?}): {} - {}",
                reason.index, reason.source_text, reason.error_kind, reason.error_detail
            );
        }
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
