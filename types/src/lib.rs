//! Core domain types for Innersight.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

pub mod catalog;
mod sanitize;
pub mod ui;

pub use catalog::{Catalog, MODULATORS, SIGNALS};
pub use sanitize::sanitize_terminal_text;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Catalog Entries
// ============================================================================

/// A selectable "dynamic" shown first in the flow.
///
/// Identity is the name; two signals with the same name are the same signal.
#[derive(Debug, Clone, Copy)]
pub struct Signal {
    name: &'static str,
    description: &'static str,
}

impl Signal {
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

/// A selectable "emotional texture" shown second, conditioned on the chosen signal.
#[derive(Debug, Clone, Copy)]
pub struct Modulator {
    name: &'static str,
    description: &'static str,
}

impl Modulator {
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

macro_rules! name_identity {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.name == other.name
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.name.hash(state);
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name)
            }
        }
    };
}

name_identity!(Signal);
name_identity!(Modulator);

// ============================================================================
// Insight
// ============================================================================

/// The generated output artifact for a (signal, modulator) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub reflection: String,
    pub action_cue: String,
    pub journal_prompt: String,
}

#[derive(Debug, Error)]
pub enum InsightParseError {
    #[error("insight payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("insight payload is missing or has an invalid shape: {0}")]
    Shape(#[source] serde_json::Error),
    #[error("insight field `{0}` is empty")]
    EmptyField(&'static str),
}

impl Insight {
    /// Parse a model response body into an insight.
    ///
    /// All four fields are required strings and must be non-blank once
    /// terminal control sequences are stripped. Unknown fields are ignored.
    pub fn from_json(text: &str) -> Result<Self, InsightParseError> {
        let value: serde_json::Value =
            serde_json::from_str(text.trim()).map_err(InsightParseError::Json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, InsightParseError> {
        let insight: Insight = serde_json::from_value(value).map_err(InsightParseError::Shape)?;
        insight.ensure_complete()?;
        Ok(insight)
    }

    fn ensure_complete(&self) -> Result<(), InsightParseError> {
        let fields = [
            ("title", &self.title),
            ("reflection", &self.reflection),
            ("action_cue", &self.action_cue),
            ("journal_prompt", &self.journal_prompt),
        ];
        // Judge what will be displayed: escapes alone count as blank.
        match fields
            .iter()
            .find(|(_, value)| sanitize_terminal_text(value).trim().is_empty())
        {
            Some((name, _)) => Err(InsightParseError::EmptyField(*name)),
            None => Ok(()),
        }
    }

    /// Deterministic stand-in used when generation fails.
    ///
    /// Derived purely from the two names; no external call.
    #[must_use]
    pub fn fallback(signal: &str, modulator: &str) -> Self {
        let signal_lower = signal.to_lowercase();
        let modulator_lower = modulator.to_lowercase();
        Self {
            title: format!("{modulator} {signal}"),
            reflection: format!(
                "When {signal_lower} meets {modulator_lower}, the space between action and \
                 thought becomes thin. Observe the quiet details that usually go unnoticed; \
                 they are the true anchors of your current journey."
            ),
            action_cue: "Sit in silence for five minutes without any digital distraction."
                .to_string(),
            journal_prompt: format!(
                "How does the texture of {modulator_lower} change when you stop trying to \
                 control {signal_lower}?"
            ),
        }
    }

    /// Copy with every field passed through terminal sanitization.
    ///
    /// Model output is untrusted and must not reach the terminal raw.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            title: sanitize_terminal_text(&self.title).into_owned(),
            reflection: sanitize_terminal_text(&self.reflection).into_owned(),
            action_cue: sanitize_terminal_text(&self.action_cue).into_owned(),
            journal_prompt: sanitize_terminal_text(&self.journal_prompt).into_owned(),
        }
    }
}

// ============================================================================
// API Key
// ============================================================================

/// Gemini API key.
///
/// Note: `Debug` is manually implemented to redact the key value, preventing accidental
/// credential disclosure in logs or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key. Blank input yields `None`.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(<redacted>)")
    }
}
