//! Build the configured insight provider.

use std::sync::Arc;

use innersight_providers::placeholder::DEFAULT_DELAY;
use innersight_providers::{
    ApiKey, GeminiConfig, GeminiProvider, InsightProvider, PlaceholderProvider, WithFallback,
    is_loopback_http,
};

use crate::config::{InnersightConfig, ProviderKind};

/// Provider selected by configuration, wrapped in [`WithFallback`] unless
/// `[insight] fallback = false`.
#[must_use]
pub fn build_provider(config: &InnersightConfig) -> Arc<dyn InsightProvider> {
    let base: Box<dyn InsightProvider> = match config.provider_kind() {
        ProviderKind::Gemini => Box::new(GeminiProvider::new(gemini_config(config))),
        ProviderKind::Placeholder => Box::new(PlaceholderProvider::new(
            config.placeholder_delay().unwrap_or(DEFAULT_DELAY),
        )),
    };

    let fallback = config.fallback_enabled();
    tracing::info!(provider = base.name(), fallback, "Insight provider ready");

    if fallback {
        Arc::new(WithFallback::new(base))
    } else {
        Arc::from(base)
    }
}

fn gemini_config(config: &InnersightConfig) -> GeminiConfig {
    let api_key = config.google_api_key().and_then(ApiKey::new);
    if api_key.is_none() {
        tracing::warn!("No Gemini API key found (GEMINI_API_KEY or [api_keys] google)");
    }

    let mut gemini = GeminiConfig {
        api_key,
        ..GeminiConfig::default()
    };
    if let Some(model) = config.google_model() {
        gemini.model = model.to_string();
    }
    if let Some(base_url) = config.google_base_url() {
        if base_url.starts_with("https://") || is_loopback_http(base_url) {
            gemini.base_url = base_url.to_string();
        } else {
            tracing::warn!(
                base_url,
                "Ignoring [google] base_url: only https or loopback http is allowed"
            );
        }
    }
    gemini.timeout = config.google_timeout().unwrap_or(gemini.timeout);
    gemini
}
