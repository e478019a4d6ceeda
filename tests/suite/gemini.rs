//! Gemini provider behaviour through its public surface.

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use innersight_providers::retry::RetryConfig;
use innersight_providers::{GeminiProvider, InsightProvider, ProviderError, WithFallback};

use crate::common::{gemini_body, gemini_provider, generate_path, insight_text, mount_insight};

fn retrying_provider(server: &MockServer) -> GeminiProvider {
    let mut config = gemini_provider(server).config().clone();
    config.retry = RetryConfig {
        max_retries: 2,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(10),
        jitter_factor: 0.0,
    };
    GeminiProvider::with_client(config, reqwest::Client::new())
}

#[tokio::test]
async fn insight_comes_back_typed() {
    let server = MockServer::start().await;
    mount_insight(&server, "Curiosity Tension").await;

    let insight = gemini_provider(&server)
        .generate("Tension", "Curiosity")
        .await
        .unwrap();
    assert_eq!(insight.title, "Curiosity Tension");
    assert_eq!(insight.action_cue, "Walk without a destination for ten minutes.");
}

#[tokio::test]
async fn api_key_travels_in_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&insight_text("Ok"))))
        .expect(1)
        .mount(&server)
        .await;

    gemini_provider(&server)
        .generate("Clarity", "Resonance")
        .await
        .unwrap();
}

#[tokio::test]
async fn rate_limit_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_insight(&server, "Adaptability Ambiguity").await;

    let insight = retrying_provider(&server)
        .generate("Ambiguity", "Adaptability")
        .await
        .unwrap();
    assert_eq!(insight.title, "Adaptability Ambiguity");
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 2);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let err = retrying_provider(&server)
        .generate("Clarity", "Resonance")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Api { .. }), "{err:?}");
}

#[tokio::test]
async fn malformed_insight_is_rejected() {
    let server = MockServer::start().await;
    let partial = serde_json::json!({ "title": "Only a title" }).to_string();
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&partial)))
        .mount(&server)
        .await;

    let err = gemini_provider(&server)
        .generate("Clarity", "Resonance")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Schema(_)), "{err:?}");
}

#[tokio::test]
async fn fallback_covers_malformed_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("not json at all")))
        .mount(&server)
        .await;

    let provider = WithFallback::new(gemini_provider(&server));
    let insight = provider.generate("Tension", "Resistance").await.unwrap();
    assert_eq!(insight.title, "Resistance Tension");
    assert_eq!(
        insight.journal_prompt,
        "How does the texture of resistance change when you stop trying to control tension?"
    );
}
