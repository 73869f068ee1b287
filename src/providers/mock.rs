/*!
 * Mock provider implementation for testing.
 *
 * `MockProvider` answers in-process, without any network access:
 * - `MockProvider::echo()` - Returns the text unchanged unless a translation is registered
 * - `MockProvider::failing(err)` - Always fails with the given error
 * - Builder methods script per-text failures, panics and delays
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{Provider, TranslationRequest};
use crate::errors::ProviderError;

/// Mock provider with scripted behaviour
#[derive(Debug, Default)]
pub struct MockProvider {
    /// Registered translations, other texts are echoed
    translations: HashMap<String, String>,
    /// Error returned for every call
    fail_all: Option<ProviderError>,
    /// Error returned for a given text, forever
    failures: HashMap<String, ProviderError>,
    /// Error returned for a given text a limited number of times
    flaky: Mutex<HashMap<String, (usize, ProviderError)>>,
    /// Texts whose translation panics
    panics: HashSet<String>,
    /// Delay before answering a given text
    delays: HashMap<String, Duration>,
    /// Delay before answering any other text
    default_delay: Duration,
    /// Number of calls made
    calls: AtomicUsize,
    /// Texts received, in call order
    requests: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a provider that returns every text unchanged
    pub fn echo() -> Self {
        Self::default()
    }

    /// Create a provider that always fails
    pub fn failing(error: ProviderError) -> Self {
        Self {
            fail_all: Some(error),
            ..Self::default()
        }
    }

    /// Register the translation returned for `text`
    pub fn with_translation(mut self, text: impl Into<String>, translated: impl Into<String>) -> Self {
        self.translations.insert(text.into(), translated.into());
        self
    }

    /// Always fail when asked to translate `text`
    pub fn fail_on(mut self, text: impl Into<String>, error: ProviderError) -> Self {
        self.failures.insert(text.into(), error);
        self
    }

    /// Fail the first `times` calls for `text`, then succeed
    pub fn fail_times(self, text: impl Into<String>, times: usize, error: ProviderError) -> Self {
        self.flaky.lock().insert(text.into(), (times, error));
        self
    }

    /// Panic when asked to translate `text`
    pub fn panic_on(mut self, text: impl Into<String>) -> Self {
        self.panics.insert(text.into());
        self
    }

    /// Wait `delay` before answering `text`
    pub fn with_delay(mut self, text: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(text.into(), delay);
        self
    }

    /// Wait `delay` before answering texts without a specific delay
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Total number of calls received
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls received for `text`
    pub fn calls_for(&self, text: &str) -> usize {
        self.requests.lock().iter().filter(|t| t.as_str() == text).count()
    }

    /// Texts received so far, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    fn scripted_failure(&self, text: &str) -> Option<ProviderError> {
        if let Some(error) = &self.fail_all {
            return Some(error.clone());
        }
        if let Some(error) = self.failures.get(text) {
            return Some(error.clone());
        }
        let mut flaky = self.flaky.lock();
        match flaky.get_mut(text) {
            Some((remaining, error)) if *remaining > 0 => {
                *remaining -= 1;
                Some(error.clone())
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.text.clone());

        let delay = self.delays.get(&request.text).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.panics.contains(&request.text) {
            panic!("mock provider panicked on {:?}", request.text);
        }

        if let Some(error) = self.scripted_failure(&request.text) {
            return Err(error);
        }

        Ok(self
            .translations
            .get(&request.text)
            .cloned()
            .unwrap_or_else(|| request.text.clone()))
    }
}
