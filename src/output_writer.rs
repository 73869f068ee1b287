/*!
 * Renders a finished run as the plain-text translation report.
 *
 * Each record is two lines and records are separated by a blank line:
 *
 * ```text
 * ORIGINAL: Hello
 * TRADUCCIÓN: Hola
 *
 * ORIGINAL: World
 * TRADUCCIÓN: Mundo
 * ```
 */

use log::{info, warn};
use std::path::Path;

use crate::app_config::FailedEntryPolicy;
use crate::errors::OutputError;
use crate::file_utils::FileManager;
use crate::translation::{OutcomeKind, RunResult, TranslationOutcome};

/// Translation written for a failed entry under [`FailedEntryPolicy::Placeholder`]
pub const ERROR_PLACEHOLDER: &str = "<ERROR>";

/// What [`OutputWriter::write`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The destination was replaced with this many records
    Written { records: usize },
    /// The run was aborted, the destination was not touched
    SkippedAborted,
}

fn record(source_text: &str, translated_text: &str) -> String {
    format!("ORIGINAL: {}\nTRADUCCIÓN: {}\n", source_text, translated_text)
}

/// Format every included outcome, in ascending index order
pub fn format_records(result: &RunResult, policy: FailedEntryPolicy) -> String {
    render(result, policy).0
}

fn render(result: &RunResult, policy: FailedEntryPolicy) -> (String, usize) {
    let records: Vec<String> = result
        .outcomes()
        .iter()
        .filter(|outcome| outcome.kind() != OutcomeKind::SkippedEmpty)
        .filter_map(|outcome| match outcome {
            TranslationOutcome::Success { source_text, translated_text, .. } => {
                Some(record(source_text, translated_text))
            }
            TranslationOutcome::Failure { source_text, .. } => match policy {
                FailedEntryPolicy::Omit => None,
                FailedEntryPolicy::Placeholder => Some(record(source_text, ERROR_PLACEHOLDER)),
            },
        })
        .collect();

    let count = records.len();
    (records.join("\n"), count)
}

/// Writes run results to disk atomically
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputWriter {
    policy: FailedEntryPolicy,
}

impl OutputWriter {
    pub fn new(policy: FailedEntryPolicy) -> Self {
        Self { policy }
    }

    /// Replace `path` with the report for `result`; aborted runs write nothing
    pub fn write<P: AsRef<Path>>(&self, path: P, result: &RunResult) -> Result<WriteStatus, OutputError> {
        let path = path.as_ref();
        if result.is_aborted() {
            warn!("Run aborted, leaving {:?} untouched", path);
            return Ok(WriteStatus::SkippedAborted);
        }

        let (content, records) = render(result, self.policy);
        FileManager::write_atomic(path, &content)?;
        info!("Wrote {} records to {}", records, path.display());
        Ok(WriteStatus::Written { records })
    }
}
