/*!
 * Worker pool that fans translation jobs out to the provider.
 *
 * A dispatcher task pushes jobs onto a bounded queue in entry order and a fixed
 * number of worker tasks pull from it. Every submitted entry produces exactly
 * one [`TranslationOutcome`] on the outcome stream, in completion order.
 */

use futures::FutureExt;
use log::{debug, error};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use super::model::{TranslationJob, TranslationOutcome};
use super::retry::{RetryError, RetryPolicy};
use crate::catalog::Entry;
use crate::errors::{ErrorKind, ProviderError};
use crate::providers::Provider;

/// Worker pool settings
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Number of concurrent workers
    pub workers: usize,
    /// Maximum number of jobs waiting in the queue
    pub queue_capacity: usize,
    /// Timeout applied to every provider call
    pub call_timeout: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 8,
            call_timeout: Duration::from_secs(15),
        }
    }
}

/// Shared stop signal set by the collector when the run is aborted
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcomes of a running schedule, in completion order
pub struct OutcomeStream {
    receiver: mpsc::Receiver<TranslationOutcome>,
    tasks: Vec<JoinHandle<()>>,
}

impl OutcomeStream {
    /// Next outcome, or `None` once the dispatcher and every worker are done
    pub async fn next(&mut self) -> Option<TranslationOutcome> {
        self.receiver.recv().await
    }

    /// Wait for the dispatcher and worker tasks to exit
    pub async fn join(self) {
        drop(self.receiver);
        for task in self.tasks {
            if let Err(e) = task.await {
                error!("Scheduler task failed: {}", e);
            }
        }
    }
}

/// Bounded worker pool driving a provider
pub struct WorkScheduler {
    provider: Arc<dyn Provider>,
    retry: RetryPolicy,
    options: SchedulerOptions,
}

impl WorkScheduler {
    pub fn new(provider: Arc<dyn Provider>, retry: RetryPolicy, options: SchedulerOptions) -> Self {
        Self {
            provider,
            retry,
            options,
        }
    }

    /// Start translating `entries`; must be called from within a tokio runtime
    pub fn run(
        &self,
        entries: Vec<Entry>,
        source_language: &str,
        target_language: &str,
        cancel: CancelFlag,
    ) -> OutcomeStream {
        let workers = self.options.workers.max(1);
        let queue_capacity = self.options.queue_capacity.max(1);

        let (job_tx, job_rx) = mpsc::channel::<TranslationJob>(queue_capacity);
        let (outcome_tx, outcome_rx) = mpsc::channel::<TranslationOutcome>(queue_capacity + workers);
        let job_rx = Arc::new(Mutex::new(job_rx));

        let mut tasks = Vec::with_capacity(workers + 1);

        let dispatcher = Dispatcher {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            queue: job_tx,
            outcomes: outcome_tx.clone(),
            cancel: cancel.clone(),
        };
        tasks.push(tokio::spawn(dispatcher.run(entries)));

        for id in 0..workers {
            let worker = Worker {
                id,
                provider: Arc::clone(&self.provider),
                retry: self.retry.clone(),
                call_timeout: self.options.call_timeout,
                queue: Arc::clone(&job_rx),
                outcomes: outcome_tx.clone(),
                cancel: cancel.clone(),
            };
            tasks.push(tokio::spawn(worker.run()));
        }

        debug!("Started {} workers with queue capacity {}", workers, queue_capacity);

        OutcomeStream {
            receiver: outcome_rx,
            tasks,
        }
    }
}

/// Pushes jobs onto the queue in entry order
struct Dispatcher {
    source_language: String,
    target_language: String,
    queue: mpsc::Sender<TranslationJob>,
    outcomes: mpsc::Sender<TranslationOutcome>,
    cancel: CancelFlag,
}

impl Dispatcher {
    async fn run(self, entries: Vec<Entry>) {
        let total = entries.len();
        let mut submitted = 0;

        for entry in entries {
            if self.cancel.is_cancelled() {
                debug!("Dispatch stopped after {} of {} entries", submitted, total);
                break;
            }

            if entry.is_empty() {
                // Passed through without a service call
                if self.outcomes.send(TranslationOutcome::passthrough(&entry)).await.is_err() {
                    break;
                }
            } else {
                let job = TranslationJob::new(entry, self.source_language.clone(), self.target_language.clone());
                // Waits here while the queue is full
                if self.queue.send(job).await.is_err() {
                    break;
                }
            }
            submitted += 1;
        }
        // Dropping the sender closes the queue once workers drain it
    }
}

/// Pulls jobs and runs them through the retry policy
struct Worker {
    id: usize,
    provider: Arc<dyn Provider>,
    retry: RetryPolicy,
    call_timeout: Duration,
    queue: Arc<Mutex<mpsc::Receiver<TranslationJob>>>,
    outcomes: mpsc::Sender<TranslationOutcome>,
    cancel: CancelFlag,
}

impl Worker {
    async fn run(self) {
        let mut processed = 0usize;
        loop {
            let job = {
                let mut queue = self.queue.lock().await;
                queue.recv().await
            };
            let Some(job) = job else { break };

            let outcome = if self.cancel.is_cancelled() {
                TranslationOutcome::cancelled(job)
            } else {
                self.execute(job).await
            };

            processed += 1;
            if self.outcomes.send(outcome).await.is_err() {
                break;
            }
        }
        debug!("Worker {} finished after {} jobs", self.id, processed);
    }

    /// Run one job; a panic is contained and reported as this job's failure
    async fn execute(&self, job: TranslationJob) -> TranslationOutcome {
        let result = AssertUnwindSafe(self.translate(&job)).catch_unwind().await;
        let TranslationJob { entry, .. } = job;

        match result {
            Ok(Ok(translated_text)) => TranslationOutcome::Success {
                index: entry.index,
                source_text: entry.source_text,
                translated_text,
            },
            Ok(Err(retry_error)) => TranslationOutcome::Failure {
                index: entry.index,
                source_text: entry.source_text,
                error_kind: retry_error.error.kind(),
                error_detail: retry_error.to_string(),
            },
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                error!("Worker {} panicked on entry {}: {}", self.id, entry.index, detail);
                TranslationOutcome::Failure {
                    index: entry.index,
                    source_text: entry.source_text,
                    error_kind: ErrorKind::Panic,
                    error_detail: detail,
                }
            }
        }
    }

    async fn translate(&self, job: &TranslationJob) -> Result<String, RetryError> {
        let request = job.request();
        let request = &request;
        let provider = &self.provider;
        let call_timeout = self.call_timeout;

        self.retry
            .execute(move || async move {
                match tokio::time::timeout(call_timeout, provider.translate(request)).await {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout(call_timeout)),
                }
            })
            .await
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic with non-string payload".to_string()
    }
}
