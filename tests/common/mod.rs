//! Shared test utilities and fixtures
//!
//! Gemini mock servers, app construction, and a TestBackend renderer.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use innersight_engine::{App, InsightProvider, Screen, UiOptions, carousel};
use innersight_providers::retry::RetryConfig;
use innersight_providers::{ApiKey, GeminiConfig, GeminiProvider};

pub const MODEL: &str = "gemini-test";
pub const FRAME: Duration = Duration::from_millis(8);

/// Path the Gemini provider posts to for [`MODEL`].
pub fn generate_path() -> String {
    format!("/models/{MODEL}:generateContent")
}

/// A GenerateContent response whose single candidate carries `text`.
pub fn gemini_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
}

pub fn insight_text(title: &str) -> String {
    serde_json::json!({
        "title": title,
        "reflection": "Stillness shows the shape of the path.",
        "action_cue": "Walk without a destination for ten minutes.",
        "journal_prompt": "Where did you stop pushing today?"
    })
    .to_string()
}

/// Mount a successful insight response.
pub async fn mount_insight(server: &MockServer, title: &str) {
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&insight_text(title))))
        .mount(server)
        .await;
}

/// Mount a failing response with `status`.
pub async fn mount_failure(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
        .mount(server)
        .await;
}

/// Gemini provider aimed at `server`, on its own connection pool.
pub fn gemini_provider(server: &MockServer) -> GeminiProvider {
    let config = GeminiConfig {
        api_key: ApiKey::new("test-key"),
        model: MODEL.to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        retry: RetryConfig::none(),
    };
    GeminiProvider::with_client(config, reqwest::Client::new())
}

/// App with a measured, settled carousel.
pub fn ready_app(provider: Arc<dyn InsightProvider>, ui_options: UiOptions) -> App {
    let mut app = App::with_provider(provider, ui_options, carousel::DEFAULT_REPEAT);
    app.measure_carousel(80);
    app.advance(carousel::SETTLE_DELAY);
    app
}

/// Drive frames in real time until the app leaves `Loading`.
pub async fn wait_for_insight(app: &mut App) {
    for _ in 0..500 {
        if app.screen() != Screen::Loading {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
        app.advance(FRAME);
    }
    panic!("insight request never settled");
}

pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

/// Render one frame of the full UI and return its text.
pub fn render(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|frame| innersight_tui::draw(frame, app))
        .unwrap();
    buffer_text(terminal.backend().buffer())
}
