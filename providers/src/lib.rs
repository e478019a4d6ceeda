//! Insight providers.
//!
//! # Architecture
//!
//! Every source of insights implements [`InsightProvider`]: given a signal name and a
//! modulator name it asynchronously yields an [`Insight`] or a [`ProviderError`].
//! The workflow never knows which implementation it is talking to.
//!
//! - [`gemini`] - Google Gemini `generateContent` with a JSON response schema
//! - [`placeholder`] - canned insight after an artificial delay
//! - [`fallback`] - decorator that substitutes [`Insight::fallback`] on failure
//!
//! # Object Safety
//!
//! `generate` returns a [`BoxFuture`] so providers can be stored as
//! `Arc<dyn InsightProvider>` and chosen at runtime from configuration.
//!
//! # Error Handling
//!
//! Transport failures, non-2xx responses, blocked generations, and payloads that
//! do not match the insight schema all surface as [`ProviderError`]. Retries for
//! transient failures happen inside the transport ([`retry`]), never in the caller.

pub mod fallback;
pub mod gemini;
mod gemini_types;
pub mod placeholder;
pub mod retry;

use std::net::IpAddr;
use std::sync::OnceLock;
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

pub use fallback::WithFallback;
pub use gemini::{GeminiConfig, GeminiProvider};
pub use innersight_types::{ApiKey, Insight, InsightParseError};
pub use placeholder::PlaceholderProvider;

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Source of insights for a (signal, modulator) pair.
pub trait InsightProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn generate(
        &self,
        signal: &str,
        modulator: &str,
    ) -> BoxFuture<'static, Result<Insight, ProviderError>>;
}

impl<P: InsightProvider + ?Sized> InsightProvider for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn generate(
        &self,
        signal: &str,
        modulator: &str,
    ) -> BoxFuture<'static, Result<Insight, ProviderError>> {
        (**self).generate(signal, modulator)
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no Gemini API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("request failed after {attempts} attempts: {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("model error: {0}")]
    Model(String),
    #[error("generation stopped: {0}")]
    Blocked(String),
    #[error("model returned no text")]
    EmptyResponse,
    #[error("response does not match the insight schema: {0}")]
    Schema(String),
    #[error(transparent)]
    Parse(#[from] InsightParseError),
}

/// Shared hardened HTTP client.
///
/// Falls back to a minimal client (still https-only, no redirects) if the tuned
/// builder fails.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder().build().unwrap_or_else(|e| {
            tracing::error!(
                "Failed to build hardened HTTP client: {e}. Attempting minimal hardened fallback."
            );
            reqwest::Client::builder()
                .https_only(true)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap_or_default()
        })
    })
}

/// Client for plain-http endpoints on this machine (local proxies, test servers).
///
/// Same tuning as [`http_client`], minus the https requirement.
pub fn loopback_http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder()
            .https_only(false)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build loopback HTTP client: {e}. Using defaults.");
                reqwest::Client::builder()
                    .redirect(reqwest::redirect::Policy::none())
                    .build()
                    .unwrap_or_default()
            })
    })
}

/// The client to use for `base_url`.
///
/// Plain http is only ever allowed to a loopback host; every other URL gets
/// the https-only [`http_client`].
#[must_use]
pub fn client_for(base_url: &str) -> &'static reqwest::Client {
    if is_loopback_http(base_url) {
        loopback_http_client()
    } else {
        http_client()
    }
}

/// True for `http://` URLs whose host is `localhost` or a loopback address.
#[must_use]
pub fn is_loopback_http(url: &str) -> bool {
    let Ok(url) = reqwest::Url::parse(url) else {
        return false;
    };
    if url.scheme() != "http" {
        return false;
    }
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .https_only(true)
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

/// Read an error body, truncated to a fixed cap.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
