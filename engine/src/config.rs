use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use innersight_types::ui::UiOptions;

const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct InnersightConfig {
    pub app: Option<AppConfig>,
    pub api_keys: Option<ApiKeys>,
    pub google: Option<GoogleConfig>,
    pub insight: Option<InsightConfig>,
    pub carousel: Option<CarouselConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// `"gemini"` or `"placeholder"`.
    pub provider: Option<String>,
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable scroll and reveal animations.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Default, Deserialize)]
pub struct ApiKeys {
    pub google: Option<String>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let google = if self.google.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("ApiKeys").field("google", &google).finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GoogleConfig {
    pub model: Option<String>,
    /// Total per-attempt request timeout. Default: 60.
    pub timeout_seconds: Option<u64>,
    /// Override the API base URL (proxies, local testing).
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InsightConfig {
    /// Substitute a locally derived insight when generation fails. Default: true.
    #[serde(default = "default_true")]
    pub fallback: bool,
    /// Artificial latency of the placeholder provider. Default: 1000.
    pub placeholder_delay_ms: Option<u64>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            fallback: true,
            placeholder_delay_ms: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CarouselConfig {
    /// Number of back-to-back copies of the signal list. Must be odd and at least 3.
    pub repeat: Option<usize>,
}

/// Which insight source the app talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Gemini,
    Placeholder,
}

impl ProviderKind {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "placeholder" | "offline" => Some(Self::Placeholder),
            _ => None,
        }
    }
}

impl InnersightConfig {
    /// Load `~/.innersight/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Provider selection: `INNERSIGHT_PROVIDER`, then `[app] provider`, then Gemini.
    #[must_use]
    pub fn provider_kind(&self) -> ProviderKind {
        let from_env = env::var("INNERSIGHT_PROVIDER").ok();
        let from_file = self.app.as_ref().and_then(|app| app.provider.clone());
        resolve_provider_kind(from_env.as_deref(), from_file.as_deref())
    }

    /// Gemini key: `GEMINI_API_KEY`, then `API_KEY`, then `[api_keys] google`.
    #[must_use]
    pub fn google_api_key(&self) -> Option<String> {
        let from_file = self
            .api_keys
            .as_ref()
            .and_then(|keys| keys.google.as_deref())
            .map(expand_env_vars);
        [env::var("GEMINI_API_KEY").ok(), env::var("API_KEY").ok(), from_file]
            .into_iter()
            .flatten()
            .find(|key| !key.trim().is_empty())
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
                reduced_motion: app.reduced_motion,
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn fallback_enabled(&self) -> bool {
        self.insight.as_ref().is_none_or(|insight| insight.fallback)
    }

    #[must_use]
    pub fn placeholder_delay(&self) -> Option<Duration> {
        self.insight
            .as_ref()
            .and_then(|insight| insight.placeholder_delay_ms)
            .map(Duration::from_millis)
    }

    #[must_use]
    pub fn google_model(&self) -> Option<&str> {
        self.google.as_ref().and_then(|g| g.model.as_deref())
    }

    #[must_use]
    pub fn google_timeout(&self) -> Option<Duration> {
        self.google
            .as_ref()
            .and_then(|g| g.timeout_seconds)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    #[must_use]
    pub fn google_base_url(&self) -> Option<&str> {
        self.google.as_ref().and_then(|g| g.base_url.as_deref())
    }

    #[must_use]
    pub fn carousel_repeat(&self) -> Option<usize> {
        self.carousel.as_ref().and_then(|c| c.repeat)
    }
}

fn resolve_provider_kind(from_env: Option<&str>, from_file: Option<&str>) -> ProviderKind {
    for (source, raw) in [("INNERSIGHT_PROVIDER", from_env), ("[app] provider", from_file)] {
        let Some(raw) = raw else { continue };
        match ProviderKind::parse(raw) {
            Some(kind) => return kind,
            None => tracing::warn!("Unknown provider {raw:?} in {source}; ignoring"),
        }
    }
    ProviderKind::default()
}

/// Expand `${VAR}` references. Unset variables become empty.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + len];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + len + 1..];
    }

    out.push_str(rest);
    out
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".innersight").join("config.toml"))
}
