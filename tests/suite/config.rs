//! Configuration file through to a running app.

use std::io::Write;

use tempfile::NamedTempFile;
use wiremock::MockServer;

use innersight_engine::{App, InnersightConfig, Screen, build_provider, carousel};

use crate::common::{FRAME, MODEL, mount_insight, wait_for_insight};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn placeholder_provider_from_config_file() {
    let file = write_config(
        r#"
[app]
provider = "placeholder"
reduced_motion = true

[insight]
placeholder_delay_ms = 5

[carousel]
repeat = 4
"#,
    );
    let config = InnersightConfig::load_from(file.path()).unwrap().unwrap();
    assert_eq!(config.carousel_repeat(), Some(4));

    let mut app = App::new(&config);
    assert_eq!(app.carousel().repeat(), 5);
    assert!(app.ui_options().reduced_motion);

    app.measure_carousel(80);
    app.advance(carousel::SETTLE_DELAY);
    app.nudge_carousel(1);
    app.confirm_signal();
    app.move_modulator_cursor(4);
    app.confirm_modulator();
    wait_for_insight(&mut app).await;

    assert_eq!(app.screen(), Screen::InsightCard);
    let insight = app.state().insight().unwrap();
    assert_eq!(insight.title, "Curiosity Momentum");
    assert_eq!(insight.reflection, "This is a placeholder reflection for testing.");

    // Reduced motion shows the whole card at once.
    app.advance(FRAME);
    assert!(app.can_begin_again());
    app.begin_again();
    assert_eq!(app.screen(), Screen::SignalSelection);
}

#[test]
fn broken_config_is_an_error_with_its_path() {
    let file = write_config("[app\nprovider = ");
    let err = InnersightConfig::load_from(file.path()).unwrap_err();
    assert_eq!(err.path(), file.path());
}

#[test]
fn missing_config_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("config.toml");
    assert!(InnersightConfig::load_from(&missing).unwrap().is_none());
}

#[tokio::test]
async fn local_http_base_url_reaches_the_server() {
    let server = MockServer::start().await;
    mount_insight(&server, "Local Clarity").await;

    let file = write_config(&format!(
        r#"
[app]
provider = "gemini"

[api_keys]
google = "test-key"

[google]
model = "{MODEL}"
base_url = "{}"

[insight]
fallback = false
"#,
        server.uri()
    ));
    let config = InnersightConfig::load_from(file.path()).unwrap().unwrap();

    let provider = build_provider(&config);
    let insight = provider.generate("Clarity", "Resonance").await.unwrap();
    assert_eq!(insight.title, "Local Clarity");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
