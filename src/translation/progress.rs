/*!
 * Progress reporting for a running translation.
 *
 * The collector sends one event per recorded outcome over an unbounded
 * channel, so reporting never blocks the pipeline. A background task renders
 * the events either as an indicatif progress bar or as periodic log lines.
 */

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::model::OutcomeKind;

/// How progress is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Interactive progress bar on stderr
    Bar,
    /// An info line every `every` completions and at the end
    Log { every: usize },
    /// Count only
    Silent,
}

/// One recorded outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub index: usize,
    pub kind: OutcomeKind,
}

/// Counters accumulated by the reporter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCounts {
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped_empty: usize,
}

impl ProgressCounts {
    fn record(&mut self, kind: OutcomeKind) {
        self.completed += 1;
        match kind {
            OutcomeKind::Succeeded => self.succeeded += 1,
            OutcomeKind::SkippedEmpty => self.skipped_empty += 1,
            OutcomeKind::Failed(_) => self.failed += 1,
        }
    }
}

/// Cloneable handle used to report completed entries
#[derive(Debug, Clone)]
pub struct ProgressSender {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSender {
    pub fn report(&self, event: ProgressEvent) {
        // The reporter outliving the run is not required
        let _ = self.sender.send(event);
    }
}

/// Handle on the background reporting task
pub struct ProgressHandle {
    task: JoinHandle<ProgressCounts>,
}

impl ProgressHandle {
    /// Wait for the reporter to drain; every sender must be dropped first
    pub async fn finish(self) -> ProgressCounts {
        match self.task.await {
            Ok(counts) => counts,
            Err(e) => {
                debug!("Progress reporter stopped abnormally: {}", e);
                ProgressCounts::default()
            }
        }
    }
}

pub struct ProgressReporter;

impl ProgressReporter {
    /// Start a reporter for `total` entries
    pub fn spawn(total: usize, mode: ProgressMode) -> (ProgressSender, ProgressHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(Self::run(total, mode, receiver));
        (ProgressSender { sender }, ProgressHandle { task })
    }

    async fn run(
        total: usize,
        mode: ProgressMode,
        mut receiver: mpsc::UnboundedReceiver<ProgressEvent>,
    ) -> ProgressCounts {
        let start = Instant::now();
        let mut counts = ProgressCounts::default();
        let bar = match mode {
            ProgressMode::Bar => Some(Self::progress_bar(total)),
            _ => None,
        };

        while let Some(event) = receiver.recv().await {
            counts.record(event.kind);
            if let OutcomeKind::Failed(kind) = event.kind {
                debug!("Entry {} failed ({})", event.index, kind);
            }

            match mode {
                ProgressMode::Bar => {
                    if let Some(bar) = &bar {
                        bar.inc(1);
                        bar.set_message(format!("{} ok, {} failed", counts.succeeded, counts.failed));
                    }
                }
                ProgressMode::Log { every } => {
                    let every = every.max(1);
                    if counts.completed % every == 0 && counts.completed != total {
                        Self::log_line(&counts, total, start);
                    }
                }
                ProgressMode::Silent => {}
            }
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        if let ProgressMode::Log { .. } = mode {
            Self::log_line(&counts, total, start);
        }
        counts
    }

    fn progress_bar(total: usize) -> ProgressBar {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg} {per_sec} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar
    }

    fn log_line(counts: &ProgressCounts, total: usize, start: Instant) {
        info!(
            "Progress: {}/{} entries ({} ok, {} failed, {} empty) - {:.1} entries/s",
            counts.completed,
            total,
            counts.succeeded,
            counts.failed,
            counts.skipped_empty,
            rate(counts.completed, start)
        );
    }
}

/// Completed entries per second since `start`
fn rate(completed: usize, start: Instant) -> f64 {
    let secs = start.elapsed().as_secs_f64();
    if secs > 0.0 { completed as f64 / secs } else { 0.0 }
}
