/*!
 * Tests for the LibreTranslate client against a mockito server
 */

use anyhow::Result;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use potrad::errors::ProviderError;
use potrad::providers::libretranslate::LibreTranslate;
use potrad::providers::{Provider, TranslationRequest};
use crate::common;

fn request(text: &str) -> TranslationRequest {
    TranslationRequest::new(text, "en", "es")
}

/// Test that a successful response is trimmed and the request body has the expected fields
#[tokio::test]
async fn test_translate_withSuccessResponse_shouldReturnTrimmedText() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/translate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "q": "Hello", "source": "en", "target": "es", "format": "text" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"translatedText":"  Hola  "}"#)
        .expect(1)
        .create_async()
        .await;
    let client = LibreTranslate::new(common::translate_url(&server), Duration::from_secs(5))?;

    let translated = client.translate(&request("Hello")).await?;

    assert_eq!(translated, "Hola");
    mock.assert_async().await;
    Ok(())
}

/// Test the alternative response field names
#[tokio::test]
async fn test_translate_withAlternativeField_shouldReturnText() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/translate")
        .with_status(200)
        .with_body(r#"{"translation":"Mundo"}"#)
        .create_async()
        .await;
    let client = LibreTranslate::new(common::translate_url(&server), Duration::from_secs(5))?;

    assert_eq!(client.translate(&request("World")).await?, "Mundo");
    Ok(())
}

/// Test that a non-2xx response keeps its status and body
#[tokio::test]
async fn test_translate_withServerError_shouldReturnServiceError() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/translate")
        .with_status(503)
        .with_body(r#"{"error":"overloaded"}"#)
        .create_async()
        .await;
    let client = LibreTranslate::new(common::translate_url(&server), Duration::from_secs(5))?;

    let err = client.translate(&request("Hello")).await.unwrap_err();

    assert_eq!(
        err,
        ProviderError::Service { status_code: 503, body: r#"{"error":"overloaded"}"#.to_string() }
    );
    assert!(err.is_transient());
    Ok(())
}

/// Test that missing or blank translations and non-JSON bodies are malformed responses
#[tokio::test]
async fn test_translate_withUnusableBody_shouldReturnMalformedResponse() -> Result<()> {
    let mut server = Server::new_async().await;
    let cases = [
        ("Blank", r#"{"translatedText":"   "}"#),
        ("Missing", r#"{"detected":"en"}"#),
        ("Html", "<html>oops</html>"),
    ];
    let mut mocks = Vec::new();
    for (text, body) in cases {
        let mock = server
            .mock("POST", "/translate")
            .match_body(Matcher::PartialJson(json!({ "q": text })))
            .with_status(200)
            .with_body(body)
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }
    let client = LibreTranslate::new(common::translate_url(&server), Duration::from_secs(5))?;

    for (text, _) in cases {
        let err = client.translate(&request(text)).await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)), "unexpected error for {}: {}", text, err);
    }
    for mock in &mocks {
        mock.assert_async().await;
    }
    Ok(())
}

/// Test that a refused connection is a network error
#[tokio::test]
async fn test_translate_withRefusedConnection_shouldReturnNetworkError() -> Result<()> {
    let url = common::refused_url().await?;
    let client = LibreTranslate::new(url, Duration::from_secs(5))?;

    let err = client.translate(&request("Hello")).await.unwrap_err();

    assert!(matches!(err, ProviderError::Network(_)), "unexpected error: {}", err);
    Ok(())
}

/// Test that a service answering too slowly hits the client timeout
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_translate_withSlowServer_shouldTimeOut() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/translate")
        .with_status(200)
        .with_body_from_request(|_| {
            std::thread::sleep(Duration::from_secs(1));
            br#"{"translatedText":"Hola"}"#.to_vec()
        })
        .create_async()
        .await;
    let client = LibreTranslate::new(common::translate_url(&server), Duration::from_millis(200))?;

    let err = client.translate(&request("Hello")).await.unwrap_err();

    assert_eq!(err, ProviderError::Timeout(Duration::from_millis(200)));
    Ok(())
}
