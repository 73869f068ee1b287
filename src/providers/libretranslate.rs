use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::{Provider, TranslationRequest};
use crate::errors::ProviderError;

/// Fields that may carry the translation, in lookup order
const TRANSLATION_FIELDS: &[&str] = &["translatedText", "translation", "text"];

/// Client for a LibreTranslate-compatible `/translate` endpoint
#[derive(Debug, Clone)]
pub struct LibreTranslate {
    /// Full URL of the translate endpoint
    url: String,
    /// HTTP client carrying the per-call timeout
    client: Client,
    /// Call timeout, kept for error reporting
    timeout: Duration,
    /// Longer texts are truncated before sending
    max_text_length: usize,
}

/// Request body of the translate endpoint
#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

impl LibreTranslate {
    /// Create a new client for `url` with a per-call timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
            timeout,
            max_text_length: 5000,
        })
    }

    /// Set the maximum number of characters sent in one request
    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn truncate<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        match text.char_indices().nth(self.max_text_length) {
            Some((cut, _)) => {
                warn!(
                    "Text too long ({} chars), truncating to {}",
                    text.chars().count(),
                    self.max_text_length
                );
                std::borrow::Cow::Owned(text[..cut].to_string())
            }
            None => std::borrow::Cow::Borrowed(text),
        }
    }

    fn classify(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Network(format!("Failed to send request to {}: {}", self.url, e))
        }
    }
}

/// Pull the translated text out of a decoded response body
pub fn extract_translated_text(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    TRANSLATION_FIELDS
        .iter()
        .filter_map(|field| object.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Provider for LibreTranslate {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let text = self.truncate(&request.text);
        let body = TranslateBody {
            q: &text,
            source: &request.source_language,
            target: &request.target_language,
            format: "text",
        };

        let response = self.client.post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            debug!("Translation API error ({}): {}", status, response_text);
            return Err(ProviderError::Service {
                status_code: status.as_u16(),
                body: response_text,
            });
        }

        let value: Value = serde_json::from_str(&response_text).map_err(|e| {
            ProviderError::MalformedResponse(format!("invalid JSON ({}): {}", e, preview(&response_text)))
        })?;

        extract_translated_text(&value).ok_or_else(|| {
            error!(
                "Unexpected translation response for {:?}: {}",
                preview(&request.text),
                preview(&response_text)
            );
            ProviderError::MalformedResponse(format!(
                "no translated text in response: {}",
                preview(&response_text)
            ))
        })
    }
}

/// First 200 characters of a body, for log messages
fn preview(text: &str) -> String {
    if text.chars().count() > 200 {
        text.chars().take(200).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
