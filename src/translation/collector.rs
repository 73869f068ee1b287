/*!
 * Collects outcomes in completion order and restores entry order.
 *
 * The collector is the single consumer of the outcome stream. It owns the
 * abort decision: unless `continue_on_error` is set, the first real failure
 * raises the shared [`CancelFlag`] so no new jobs start.
 */

use log::{debug, error, warn};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::model::{OutcomeKind, TranslationOutcome};
use super::progress::{ProgressEvent, ProgressSender};
use super::scheduler::{CancelFlag, OutcomeStream};
use crate::errors::ErrorKind;

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries submitted to the run
    pub total: usize,
    pub succeeded: usize,
    /// Entries attempted without success
    pub failed: usize,
    /// Empty entries passed through without a service call
    pub skipped_empty: usize,
    /// Entries dequeued after the abort and never attempted
    pub cancelled: usize,
    /// Entries the dispatcher never queued because of the abort
    pub not_attempted: usize,
}

/// First failure of a run that was not allowed to continue
#[derive(Debug, Clone, PartialEq)]
pub struct AbortReason {
    pub index: usize,
    pub source_text: String,
    pub error_kind: ErrorKind,
    pub error_detail: String,
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunResult {
    outcomes: Vec<TranslationOutcome>,
    summary: RunSummary,
    aborted: Option<AbortReason>,
    elapsed: Duration,
}

impl RunResult {
    /// Recorded outcomes, ordered by entry index
    pub fn outcomes(&self) -> &[TranslationOutcome] {
        &self.outcomes
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn aborted(&self) -> Option<&AbortReason> {
        self.aborted.as_ref()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Single consumer of a run's outcomes
pub struct ResultCollector {
    total: usize,
    continue_on_error: bool,
    cancel: CancelFlag,
    progress: Option<ProgressSender>,
    outcomes: BTreeMap<usize, TranslationOutcome>,
    summary: RunSummary,
    aborted: Option<AbortReason>,
    start: Instant,
}

impl ResultCollector {
    pub fn new(total: usize, continue_on_error: bool, cancel: CancelFlag) -> Self {
        Self {
            total,
            continue_on_error,
            cancel,
            progress: None,
            outcomes: BTreeMap::new(),
            summary: RunSummary {
                total,
                ..RunSummary::default()
            },
            aborted: None,
            start: Instant::now(),
        }
    }

    /// Report every recorded outcome to a progress reporter
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Record one outcome; a second outcome for the same index is ignored
    pub fn record(&mut self, outcome: TranslationOutcome) {
        let index = outcome.index();
        if self.outcomes.contains_key(&index) {
            warn!("Duplicate outcome for entry {} ignored", index);
            return;
        }

        let kind = outcome.kind();
        match kind {
            OutcomeKind::Succeeded => self.summary.succeeded += 1,
            OutcomeKind::SkippedEmpty => self.summary.skipped_empty += 1,
            OutcomeKind::Failed(ErrorKind::Cancelled) => self.summary.cancelled += 1,
            OutcomeKind::Failed(_) => self.summary.failed += 1,
        }

        if let TranslationOutcome::Failure { source_text, error_kind, error_detail, .. } = &outcome {
            if *error_kind == ErrorKind::Cancelled {
                debug!("Entry {} cancelled", index);
            } else {
                error!("Entry {} ({:?}) failed [{}]: {}", index, source_text, error_kind, error_detail);
                if !self.continue_on_error && self.aborted.is_none() {
                    self.aborted = Some(AbortReason {
                        index,
                        source_text: source_text.clone(),
                        error_kind: *error_kind,
                        error_detail: error_detail.clone(),
                    });
                    self.cancel.cancel();
                }
            }
        }

        if let Some(progress) = &self.progress {
            progress.report(ProgressEvent { index, kind });
        }
        self.outcomes.insert(index, outcome);
    }

    /// Close the run; entries without an outcome are counted as not attempted
    pub fn finalize(self) -> RunResult {
        let mut summary = self.summary;
        summary.not_attempted = self.total.saturating_sub(self.outcomes.len());

        RunResult {
            outcomes: self.outcomes.into_values().collect(),
            summary,
            aborted: self.aborted,
            elapsed: self.start.elapsed(),
        }
    }

    /// Drain `stream` until the scheduler is done
    pub async fn collect(mut self, mut stream: OutcomeStream) -> RunResult {
        while let Some(outcome) = stream.next().await {
            self.record(outcome);
        }
        stream.join().await;
        self.finalize()
    }
}
