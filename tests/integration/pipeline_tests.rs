/*!
 * Integration tests for the scheduler and collector working together.
 *
 * All tests use the in-process mock provider; completion order is shuffled with
 * seeded random delays so that runs are reproducible.
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use potrad::app_config::FailedEntryPolicy;
use potrad::catalog::Entry;
use potrad::errors::{ErrorKind, ProviderError};
use potrad::output_writer::format_records;
use potrad::providers::mock::MockProvider;
use potrad::translation::{
    CancelFlag, OutcomeKind, ResultCollector, RetryPolicy, RunResult, SchedulerOptions,
    TranslationOutcome, WorkScheduler,
};
use crate::common;

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_millis(1), Duration::from_millis(4))
}

fn options(workers: usize, queue_capacity: usize) -> SchedulerOptions {
    SchedulerOptions {
        workers,
        queue_capacity,
        call_timeout: Duration::from_secs(5),
    }
}

async fn run_pipeline(
    provider: Arc<MockProvider>,
    entries: Vec<Entry>,
    retry: RetryPolicy,
    options: SchedulerOptions,
    continue_on_error: bool,
) -> RunResult {
    let total = entries.len();
    let cancel = CancelFlag::new();
    let stream = WorkScheduler::new(provider, retry, options).run(entries, "en", "es", cancel.clone());
    ResultCollector::new(total, continue_on_error, cancel).collect(stream).await
}

fn texts(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("text {}", i)).collect()
}

/// Test that every entry yields exactly one outcome with dense indices
#[tokio::test]
async fn test_run_withManyEntries_shouldYieldDenseIndices() {
    let texts = texts(57);
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let provider = Arc::new(MockProvider::echo());

    let result = run_pipeline(provider.clone(), common::entries(&refs), fast_retry(3), options(5, 3), false).await;

    let indices: Vec<_> = result.outcomes().iter().map(|o| o.index()).collect();
    assert_eq!(indices, (0..57).collect::<Vec<_>>());
    assert_eq!(result.summary().succeeded, 57);
    assert_eq!(result.summary().not_attempted, 0);
    assert_eq!(provider.call_count(), 57);
}

/// Test that output order does not depend on completion order
#[tokio::test]
async fn test_run_withRandomCompletionDelays_shouldKeepEntryOrder() {
    let mut rng = StdRng::seed_from_u64(42);
    let texts = texts(30);
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let mut provider = MockProvider::echo();
    for text in &texts {
        let delay = Duration::from_millis(rng.random_range(0..25));
        provider = provider.with_delay(text.clone(), delay);
    }

    let result = run_pipeline(Arc::new(provider), common::entries(&refs), fast_retry(3), options(6, 4), false).await;

    let sources: Vec<_> = result.outcomes().iter().map(|o| o.source_text()).collect();
    assert_eq!(sources, refs);

    let expected: Vec<String> = texts
        .iter()
        .map(|t| format!("ORIGINAL: {}\nTRADUCCIÓN: {}\n", t, t))
        .collect();
    assert_eq!(format_records(&result, FailedEntryPolicy::Omit), expected.join("\n"));
}

/// Test that empty entries pass through without reaching the service
#[tokio::test]
async fn test_run_withEmptyEntryBetweenTexts_shouldSkipServiceForIt() {
    let provider = Arc::new(
        MockProvider::echo()
            .with_translation("Hello", "Hola")
            .with_translation("World", "Mundo"),
    );

    let result = run_pipeline(
        provider.clone(),
        common::entries(&["Hello", "", "World"]),
        fast_retry(3),
        options(2, 2),
        false,
    )
    .await;

    assert_eq!(provider.calls_for(""), 0);
    assert_eq!(provider.call_count(), 2);
    assert_eq!(result.summary().skipped_empty, 1);
    assert_eq!(result.outcomes()[1].kind(), OutcomeKind::SkippedEmpty);
    assert_eq!(
        format_records(&result, FailedEntryPolicy::Omit),
        "ORIGINAL: Hello\nTRADUCCIÓN: Hola\n\nORIGINAL: World\nTRADUCCIÓN: Mundo\n"
    );
}

/// Test that an always-transient error is attempted exactly max_attempts times
#[tokio::test]
async fn test_run_withAlwaysUnavailableService_shouldStopAtMaxAttempts() {
    let provider = Arc::new(MockProvider::failing(ProviderError::Service {
        status_code: 503,
        body: "unavailable".to_string(),
    }));

    let result = run_pipeline(provider.clone(), common::entries(&["Hello"]), fast_retry(4), options(1, 1), true).await;

    assert_eq!(provider.call_count(), 4);
    match &result.outcomes()[0] {
        TranslationOutcome::Failure { error_kind, error_detail, .. } => {
            assert_eq!(*error_kind, ErrorKind::Service);
            assert!(error_detail.contains("after 4 attempts"), "detail: {}", error_detail);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

/// Test that a transient failure followed by success yields the translation
#[tokio::test]
async fn test_run_withFlakyService_shouldRecover() {
    let provider = Arc::new(
        MockProvider::echo()
            .with_translation("Hello", "Hola")
            .fail_times("Hello", 2, ProviderError::Network("connection reset".to_string())),
    );

    let result = run_pipeline(provider.clone(), common::entries(&["Hello"]), fast_retry(3), options(1, 1), false).await;

    assert_eq!(provider.calls_for("Hello"), 3);
    assert_eq!(
        result.outcomes()[0],
        TranslationOutcome::Success {
            index: 0,
            source_text: "Hello".to_string(),
            translated_text: "Hola".to_string(),
        }
    );
    assert!(!result.is_aborted());
}

/// Test that a permanent failure aborts the run and stops further dispatch
#[tokio::test]
async fn test_run_withFailureAndNoContinue_shouldAbortEarly() {
    let texts = texts(10);
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let provider = Arc::new(
        MockProvider::echo()
            .with_default_delay(common::short_delay(20))
            .fail_on("text 2", ProviderError::Service { status_code: 400, body: "bad request".to_string() }),
    );

    let result = run_pipeline(provider.clone(), common::entries(&refs), fast_retry(3), options(1, 1), false).await;

    assert!(provider.call_count() < 10, "calls: {}", provider.call_count());
    assert_eq!(provider.calls_for("text 2"), 1);

    let reason = result.aborted().expect("run should be aborted");
    assert_eq!(reason.index, 2);
    assert_eq!(reason.error_kind, ErrorKind::Service);

    // The job after the failure may already be in flight when the flag is raised
    let summary = result.summary();
    assert!((2..=3).contains(&summary.succeeded), "succeeded: {}", summary.succeeded);
    assert_eq!(summary.failed, 1);
    assert_eq!(
        summary.succeeded + summary.failed + summary.skipped_empty + summary.cancelled + summary.not_attempted,
        10
    );
    assert!(summary.cancelled + summary.not_attempted > 0);
}

/// Test that continue-on-error attempts every entry despite a failure
#[tokio::test]
async fn test_run_withFailureAndContinue_shouldAttemptAll() {
    let texts = texts(10);
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let provider = Arc::new(
        MockProvider::echo()
            .with_default_delay(common::short_delay(5))
            .fail_on("text 2", ProviderError::Service { status_code: 400, body: "bad request".to_string() }),
    );

    let result = run_pipeline(provider.clone(), common::entries(&refs), fast_retry(3), options(1, 1), true).await;

    assert_eq!(provider.call_count(), 10);
    assert!(!result.is_aborted());
    assert_eq!(result.summary().succeeded, 9);
    assert_eq!(result.summary().failed, 1);
    assert_eq!(result.outcomes().len(), 10);
}

/// Test that a panicking job is contained and later jobs still succeed
#[tokio::test]
async fn test_run_withPanickingJob_shouldReportPanicFailure() {
    let provider = Arc::new(MockProvider::echo().panic_on("explode"));

    let result = run_pipeline(
        provider,
        common::entries(&["first", "explode", "third", "fourth"]),
        fast_retry(3),
        options(1, 1),
        true,
    )
    .await;

    assert_eq!(result.outcomes().len(), 4);
    assert_eq!(result.outcomes()[1].kind(), OutcomeKind::Failed(ErrorKind::Panic));
    assert!(result.outcomes()[2].is_success());
    assert!(result.outcomes()[3].is_success());
    assert_eq!(result.summary().succeeded, 3);
}

/// Test that a per-call timeout is retried and reported as a network failure
#[tokio::test]
async fn test_run_withHangingCall_shouldTimeOutPerAttempt() {
    let provider = Arc::new(MockProvider::echo().with_delay("hang", Duration::from_secs(5)));
    let options = SchedulerOptions {
        workers: 2,
        queue_capacity: 2,
        call_timeout: Duration::from_millis(30),
    };

    let result = run_pipeline(provider.clone(), common::entries(&["hang", "ok"]), fast_retry(2), options, true).await;

    assert_eq!(provider.calls_for("hang"), 2);
    assert_eq!(result.outcomes()[0].kind(), OutcomeKind::Failed(ErrorKind::Network));
    assert!(result.outcomes()[1].is_success());
}
