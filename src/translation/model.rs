/*!
 * Jobs and outcomes exchanged between the scheduler and the collector.
 */

use crate::catalog::Entry;
use crate::errors::ErrorKind;
use crate::providers::TranslationRequest;

/// An entry paired with its language pair, owned by one worker at a time
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub entry: Entry,
    pub source_language: String,
    pub target_language: String,
}

impl TranslationJob {
    pub fn new(entry: Entry, source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            entry,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Request sent to the provider for this job
    pub fn request(&self) -> TranslationRequest {
        TranslationRequest::new(
            self.entry.source_text.clone(),
            self.source_language.clone(),
            self.target_language.clone(),
        )
    }
}

/// Result of one submitted entry
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    Success {
        index: usize,
        source_text: String,
        translated_text: String,
    },
    Failure {
        index: usize,
        source_text: String,
        error_kind: ErrorKind,
        error_detail: String,
    },
}

/// Coarse classification of an outcome, used for counting and progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Succeeded,
    SkippedEmpty,
    Failed(ErrorKind),
}

impl TranslationOutcome {
    /// Synthetic success for an entry that is never sent to the service
    pub fn passthrough(entry: &Entry) -> Self {
        Self::Success {
            index: entry.index,
            source_text: entry.source_text.clone(),
            translated_text: entry.source_text.clone(),
        }
    }

    /// Failure for a job taken off the queue after the run was aborted
    pub fn cancelled(job: TranslationJob) -> Self {
        Self::Failure {
            index: job.entry.index,
            source_text: job.entry.source_text,
            error_kind: ErrorKind::Cancelled,
            error_detail: "run aborted before this entry was attempted".to_string(),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Success { index, .. } | Self::Failure { index, .. } => *index,
        }
    }

    pub fn source_text(&self) -> &str {
        match self {
            Self::Success { source_text, .. } | Self::Failure { source_text, .. } => source_text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success { source_text, .. } if source_text.is_empty() => OutcomeKind::SkippedEmpty,
            Self::Success { .. } => OutcomeKind::Succeeded,
            Self::Failure { error_kind, .. } => OutcomeKind::Failed(*error_kind),
        }
    }
}
