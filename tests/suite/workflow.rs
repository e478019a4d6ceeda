//! End-to-end selection flow against a mock Gemini server.

use std::sync::Arc;

use wiremock::MockServer;

use innersight_engine::{Insight, Screen, UiOptions};
use innersight_providers::WithFallback;

use crate::common::{gemini_provider, mount_failure, mount_insight, ready_app, wait_for_insight};

#[tokio::test]
async fn selections_reach_the_insight_card() {
    let server = MockServer::start().await;
    mount_insight(&server, "Resonance Clarity").await;

    let mut app = ready_app(Arc::new(gemini_provider(&server)), UiOptions::default());
    app.confirm_signal();
    assert_eq!(app.screen(), Screen::ModulatorSelection);
    app.confirm_modulator();
    assert_eq!(app.screen(), Screen::Loading);

    wait_for_insight(&mut app).await;

    assert_eq!(app.screen(), Screen::InsightCard);
    let state = app.state();
    assert_eq!(state.selected_signal().map(|s| s.name()), Some("Clarity"));
    assert_eq!(state.selected_modulator().map(|m| m.name()), Some("Resonance"));
    assert_eq!(state.insight().map(|i| i.title.as_str()), Some("Resonance Clarity"));
}

#[tokio::test]
async fn back_then_reselect_uses_latest_choices() {
    let server = MockServer::start().await;
    mount_insight(&server, "Cohesion Momentum").await;

    let mut app = ready_app(Arc::new(gemini_provider(&server)), UiOptions::default());
    app.confirm_signal();
    app.go_back();
    assert_eq!(app.screen(), Screen::SignalSelection);
    assert!(app.state().selected_signal().is_none());

    app.nudge_carousel(1);
    // Finish the nudge animation.
    for _ in 0..40 {
        app.advance(crate::common::FRAME);
    }
    app.confirm_signal();
    app.move_modulator_cursor(1);
    app.confirm_modulator();
    wait_for_insight(&mut app).await;

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Dynamic (Signal): Momentum"));
    assert!(prompt.contains("Emotional Texture (Modulator): Cohesion"));
}

#[tokio::test]
async fn failure_without_fallback_starts_over() {
    let server = MockServer::start().await;
    mount_failure(&server, 500).await;

    let mut app = ready_app(Arc::new(gemini_provider(&server)), UiOptions::default());
    app.confirm_signal();
    app.confirm_modulator();
    wait_for_insight(&mut app).await;

    assert_eq!(app.screen(), Screen::SignalSelection);
    assert!(app.state().selected_signal().is_none());
    assert!(app.state().selected_modulator().is_none());
    assert!(!app.is_request_in_flight());
}

#[tokio::test]
async fn failure_with_fallback_shows_the_fallback_card() {
    let server = MockServer::start().await;
    mount_failure(&server, 503).await;

    let provider = WithFallback::new(gemini_provider(&server));
    let mut app = ready_app(Arc::new(provider), UiOptions::default());
    app.confirm_signal();
    app.confirm_modulator();
    wait_for_insight(&mut app).await;

    assert_eq!(app.screen(), Screen::InsightCard);
    assert_eq!(
        app.state().insight(),
        Some(&Insight::fallback("Clarity", "Resonance"))
    );
}

#[tokio::test]
async fn second_selection_while_loading_sends_one_request() {
    let server = MockServer::start().await;
    mount_insight(&server, "Resonance Clarity").await;

    let mut app = ready_app(Arc::new(gemini_provider(&server)), UiOptions::default());
    app.confirm_signal();
    app.confirm_modulator();
    app.confirm_modulator();
    app.select_modulator_at(3);
    wait_for_insight(&mut app).await;

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert_eq!(app.state().selected_modulator().map(|m| m.name()), Some("Resonance"));
}
