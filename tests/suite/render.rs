//! Full-screen rendering of each step, checked through TestBackend buffers.

use std::sync::Arc;
use std::time::Duration;

use innersight_engine::innersight_providers::PlaceholderProvider;
use innersight_engine::{App, REVEAL_STEP, Screen, UiOptions, carousel};

use crate::common::{FRAME, render, wait_for_insight};

const WIDTH: u16 = 100;
const HEIGHT: u16 = 32;

fn app(ui_options: UiOptions) -> App {
    let provider = Arc::new(PlaceholderProvider::new(Duration::from_millis(5)));
    App::with_provider(provider, ui_options, carousel::DEFAULT_REPEAT)
}

/// First frame measures the carousel; the settle delay then makes it selectable.
fn settled(app: &mut App) {
    render(app, WIDTH, HEIGHT);
    app.advance(carousel::SETTLE_DELAY);
}

#[tokio::test]
async fn signal_screen() {
    let mut app = app(UiOptions::default());
    settled(&mut app);

    let text = render(&mut app, WIDTH, HEIGHT);
    assert!(text.contains("What's the primary dynamic?"));
    assert!(text.contains("Clarity"));
    assert!(text.contains("Select Clarity"));
    assert!(text.contains("●"));
}

#[tokio::test]
async fn modulator_screen_lists_the_catalog() {
    let mut app = app(UiOptions::default());
    settled(&mut app);
    app.confirm_signal();

    let text = render(&mut app, WIDTH, HEIGHT);
    assert!(text.contains("Dynamic: Clarity"));
    assert!(text.contains("And what's the emotional texture?"));
    for (i, name) in ["Resonance", "Cohesion", "Adaptability", "Resistance", "Curiosity"]
        .iter()
        .enumerate()
    {
        assert!(text.contains(&format!("{}. {name}", i + 1)), "missing {name}");
    }
    assert!(text.contains("An open, inquisitive approach to the unknown."));
}

#[tokio::test]
async fn loading_screen_names_the_pair() {
    let mut app = app(UiOptions::default());
    settled(&mut app);
    app.confirm_signal();
    app.move_modulator_cursor(2);
    app.confirm_modulator();
    assert_eq!(app.screen(), Screen::Loading);

    let text = render(&mut app, WIDTH, HEIGHT);
    assert!(text.contains("Cultivating Clarity..."));
    assert!(text.contains("Merging Adaptability with Clarity"));
}

#[tokio::test]
async fn insight_card_reveals_section_by_section() {
    let mut app = app(UiOptions::default());
    settled(&mut app);
    app.confirm_signal();
    app.confirm_modulator();
    wait_for_insight(&mut app).await;
    assert_eq!(app.screen(), Screen::InsightCard);

    let text = render(&mut app, WIDTH, HEIGHT);
    assert!(!text.contains("Resonance Clarity"));

    app.advance(REVEAL_STEP);
    let text = render(&mut app, WIDTH, HEIGHT);
    assert!(text.contains("Resonance Clarity"));
    assert!(!text.contains("Journal Prompt"));
    assert!(!text.contains("Begin Again"));

    let mut elapsed = Duration::ZERO;
    while elapsed < REVEAL_STEP * 3 {
        app.advance(FRAME);
        elapsed += FRAME;
    }
    let text = render(&mut app, WIDTH, HEIGHT);
    assert!(text.contains("Action"));
    assert!(text.contains("Journal Prompt"));
    assert!(text.contains("What does this dynamic reveal about your path?"));
    assert!(text.contains("Begin Again"));
}

#[tokio::test]
async fn ascii_only_avoids_unicode_glyphs() {
    let mut app = app(UiOptions {
        ascii_only: true,
        ..UiOptions::default()
    });
    settled(&mut app);
    app.confirm_signal();

    let text = render(&mut app, WIDTH, HEIGHT);
    assert!(text.contains("< Back"));
    assert!(!text.contains('←'));
    assert!(!text.contains('▸'));
}
