/*!
 * Concurrent translation of catalog entries.
 *
 * - `model`: Jobs and outcomes
 * - `retry`: Retry policy with exponential backoff
 * - `scheduler`: Bounded worker pool
 * - `collector`: Outcome collection, ordering and abort decision
 * - `progress`: Progress bar and log reporting
 */

pub mod collector;
pub mod model;
pub mod progress;
pub mod retry;
pub mod scheduler;

// Re-export main types for easier usage
pub use self::collector::{AbortReason, ResultCollector, RunResult, RunSummary};
pub use self::model::{OutcomeKind, TranslationJob, TranslationOutcome};
pub use self::progress::{ProgressCounts, ProgressEvent, ProgressHandle, ProgressMode, ProgressReporter, ProgressSender};
pub use self::retry::{Backoff, RetryError, RetryPolicy};
pub use self::scheduler::{CancelFlag, OutcomeStream, SchedulerOptions, WorkScheduler};
