//! Google Gemini insight provider.
//!
//! One non-streaming `generateContent` call per insight. The request pins the
//! response to `application/json` with a schema covering the four insight
//! fields; the returned text is validated against the same schema before it is
//! parsed.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::{Value, json};

use crate::gemini_types::Response;
use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};
use crate::{
    ApiKey, GEMINI_API_BASE_URL, Insight, InsightParseError, InsightProvider, ProviderError,
    client_for, read_capped_error_body,
};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_INSTRUCTION: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/mentor.md"));

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub base_url: String,
    /// Total time allowed for one attempt, including reading the body.
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }
}

impl GeminiConfig {
    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

pub struct GeminiProvider {
    config: Arc<GeminiConfig>,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Provider on the shared hardened client (loopback http allowed).
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        let client = client_for(&config.base_url).clone();
        Self::with_client(config, client)
    }

    #[must_use]
    pub fn with_client(config: GeminiConfig, client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl InsightProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn generate(
        &self,
        signal: &str,
        modulator: &str,
    ) -> BoxFuture<'static, Result<Insight, ProviderError>> {
        let config = Arc::clone(&self.config);
        let client = self.client.clone();
        let signal = signal.to_string();
        let modulator = modulator.to_string();
        Box::pin(async move { request_insight(&client, &config, &signal, &modulator).await })
    }
}

async fn request_insight(
    client: &reqwest::Client,
    config: &GeminiConfig,
    signal: &str,
    modulator: &str,
) -> Result<Insight, ProviderError> {
    let api_key = config.api_key.as_ref().ok_or(ProviderError::MissingApiKey)?;
    let url = config.endpoint();
    let body = build_request_body(signal, modulator);
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::debug!(
        request_id,
        model = %config.model,
        signal,
        modulator,
        "Requesting insight"
    );

    let outcome = send_with_retry(
        || {
            client
                .post(&url)
                .header("x-goog-api-key", api_key.expose_secret())
                .header("content-type", "application/json")
                .timeout(config.timeout)
                .json(&body)
        },
        &config.retry,
        &request_id,
    )
    .await;

    let response = match outcome {
        RetryOutcome::Success(response) => response,
        RetryOutcome::HttpError(response) => {
            let status = response.status();
            let body = read_capped_error_body(response).await;
            return Err(ProviderError::Api { status, body });
        }
        RetryOutcome::ConnectionError { attempts, source } => {
            return Err(ProviderError::Transport { attempts, source });
        }
    };

    let bytes = response
        .bytes()
        .await
        .map_err(|source| ProviderError::Transport {
            attempts: 1,
            source,
        })?;
    let parsed: Response = serde_json::from_slice(&bytes)
        .map_err(|e| ProviderError::Model(format!("unreadable response body: {e}")))?;

    let insight = extract_insight(&parsed)?;
    tracing::info!(request_id, title = %insight.title, "Insight generated");
    Ok(insight)
}

fn extract_insight(response: &Response) -> Result<Insight, ProviderError> {
    if let Some(error) = &response.error {
        let message = match error.code {
            Some(code) => format!("{code}: {}", error.message_or_default()),
            None => error.message_or_default().to_string(),
        };
        return Err(ProviderError::Model(message));
    }

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(ProviderError::Blocked(format!("prompt blocked: {reason}")));
    }

    if let Some(message) = response.finish_reason().and_then(|r| r.error_message()) {
        return Err(ProviderError::Blocked(message.to_string()));
    }

    let text = response.text().ok_or(ProviderError::EmptyResponse)?;
    parse_insight_text(&text)
}

/// Turn the model's JSON text into an insight, enforcing the response schema.
fn parse_insight_text(text: &str) -> Result<Insight, ProviderError> {
    let value: Value = serde_json::from_str(text.trim()).map_err(InsightParseError::Json)?;
    let validator = insight_validator()?;
    validator
        .validate(&value)
        .map_err(|e| ProviderError::Schema(e.to_string()))?;
    Ok(Insight::from_value(value)?)
}

fn insight_validator() -> Result<&'static jsonschema::Validator, ProviderError> {
    static VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
    VALIDATOR
        .get_or_init(|| {
            let mut schema = response_schema();
            to_json_schema(&mut schema);
            jsonschema::validator_for(&schema).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| ProviderError::Schema(format!("invalid insight schema: {e}")))
}

/// Response schema in Gemini's OpenAPI subset.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A two-word title combining the modulator and signal."
            },
            "reflection": {
                "type": "STRING",
                "description": "A high-quality, short philosophical paragraph."
            },
            "action_cue": {
                "type": "STRING",
                "description": "A simple, concrete action for the next 24 hours."
            },
            "journal_prompt": {
                "type": "STRING",
                "description": "A deep question to ponder or write about."
            }
        },
        "required": ["title", "reflection", "action_cue", "journal_prompt"]
    })
}

/// Gemini spells primitive types in upper case; JSON Schema wants lower case.
fn to_json_schema(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ty)) = map.get_mut("type") {
                *ty = ty.to_ascii_lowercase();
            }
            if let Some(Value::Object(properties)) = map.get_mut("properties") {
                for property in properties.values_mut() {
                    to_json_schema(property);
                }
            }
            if let Some(items) = map.get_mut("items") {
                to_json_schema(items);
            }
        }
        Value::Array(items) => {
            for item in items {
                to_json_schema(item);
            }
        }
        _ => {}
    }
}

fn user_prompt(signal: &str, modulator: &str) -> String {
    format!(
        "Generate an insight based on the following:\n\
         Dynamic (Signal): {signal}\n\
         Emotional Texture (Modulator): {modulator}\n\
         \n\
         Structure the response in JSON format."
    )
}

/// Build the `generateContent` request body.
///
/// Gemini uses mixed casing:
/// - `system_instruction` (snake_case)
/// - `generationConfig` (camelCase)
fn build_request_body(signal: &str, modulator: &str) -> Value {
    json!({
        "system_instruction": {
            "parts": [{ "text": SYSTEM_INSTRUCTION.trim() }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": user_prompt(signal, modulator) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_INSIGHT: &str = r#"{"title":"Resonance Clarity","reflection":"The path hums.","action_cue":"Walk slowly.","journal_prompt":"What hums?"}"#;

    fn candidate_body(text: &str, finish_reason: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": finish_reason
            }]
        })
    }

    fn test_provider(server: &MockServer) -> GeminiProvider {
        let config = GeminiConfig {
            api_key: ApiKey::new("test-key"),
            base_url: server.uri(),
            retry: RetryConfig::none(),
            ..GeminiConfig::default()
        };
        GeminiProvider::with_client(config, reqwest::Client::new())
    }

    #[test]
    fn request_body_carries_persona_prompt_and_schema() {
        let body = build_request_body("Clarity", "Resonance");

        let system = body["system_instruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(system.starts_with("You are a philosophical mentor"));

        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Dynamic (Signal): Clarity"));
        assert!(prompt.contains("Emotional Texture (Modulator): Resonance"));

        let generation = &body["generationConfig"];
        assert_eq!(generation["responseMimeType"], "application/json");
        assert_eq!(generation["responseSchema"]["type"], "OBJECT");
        assert_eq!(
            generation["responseSchema"]["required"],
            json!(["title", "reflection", "action_cue", "journal_prompt"])
        );
    }

    #[test]
    fn json_schema_form_is_lowercase() {
        let mut schema = response_schema();
        to_json_schema(&mut schema);
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["title"]["type"], "string");
    }

    #[test]
    fn schema_rejects_missing_and_mistyped_fields() {
        assert!(matches!(
            parse_insight_text(r#"{"title":"t","reflection":"r","action_cue":"a"}"#),
            Err(ProviderError::Schema(_))
        ));
        assert!(matches!(
            parse_insight_text(
                r#"{"title":"t","reflection":["r"],"action_cue":"a","journal_prompt":"j"}"#
            ),
            Err(ProviderError::Schema(_))
        ));
        assert!(matches!(
            parse_insight_text("no json here"),
            Err(ProviderError::Parse(InsightParseError::Json(_)))
        ));
        assert!(parse_insight_text(VALID_INSIGHT).is_ok());
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let config = GeminiConfig {
            base_url: "http://localhost:9/v1beta/".to_string(),
            ..GeminiConfig::default()
        };
        assert_eq!(
            config.endpoint(),
            "http://localhost:9/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn generates_insight_from_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-flash-preview:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body(VALID_INSIGHT, "STOP")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let insight = test_provider(&server)
            .generate("Clarity", "Resonance")
            .await
            .unwrap();
        assert_eq!(insight.title, "Resonance Clarity");
        assert_eq!(insight.journal_prompt, "What hums?");
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut provider = test_provider(&server);
        Arc::make_mut(&mut provider.config).api_key = None;
        let err = provider.generate("Clarity", "Resonance").await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey));
    }

    #[tokio::test]
    async fn api_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_provider(&server)
            .generate("Clarity", "Resonance")
            .await
            .unwrap_err();
        match err {
            ProviderError::Api { status, body } => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(body, "API key not valid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn safety_finish_reason_is_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body("", "SAFETY")),
            )
            .mount(&server)
            .await;

        let err = test_provider(&server)
            .generate("Tension", "Resistance")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Blocked(_)));
    }

    #[tokio::test]
    async fn empty_candidates_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = test_provider(&server)
            .generate("Clarity", "Cohesion")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn error_object_in_body_is_model_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": { "code": 503, "message": "overloaded" }
            })))
            .mount(&server)
            .await;

        let err = test_provider(&server)
            .generate("Clarity", "Cohesion")
            .await
            .unwrap_err();
        match err {
            ProviderError::Model(message) => assert_eq!(message, "503: overloaded"),
            other => panic!("expected Model error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn schema_violation_in_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_body(r#"{"title":"Only a title"}"#, "STOP")),
            )
            .mount(&server)
            .await;

        let err = test_provider(&server)
            .generate("Clarity", "Cohesion")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Schema(_)));
    }
}
