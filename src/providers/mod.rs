/*!
 * Translation service clients.
 *
 * This module contains the client implementations the pipeline can drive:
 * - LibreTranslate: any service speaking the LibreTranslate `/translate` contract
 * - Mock: an in-process provider with scripted behaviour, used by tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single piece of text to translate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// The text to translate
    pub text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Common trait for all translation providers
///
/// An implementation performs exactly one attempt per call. Retries, timeouts
/// and concurrency are handled by the caller.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a request
    ///
    /// # Arguments
    /// * `request` - The text and language pair to translate
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or a classified error
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;
}

pub mod libretranslate;
pub mod mock;
