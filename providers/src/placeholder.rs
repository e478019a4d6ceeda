//! Offline provider that returns a canned insight after a short delay.

use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::{Insight, InsightProvider, ProviderError};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct PlaceholderProvider {
    delay: Duration,
}

impl Default for PlaceholderProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl PlaceholderProvider {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn insight(signal: &str, modulator: &str) -> Insight {
        Insight {
            title: format!("{modulator} {signal}"),
            reflection: "This is a placeholder reflection for testing.".to_string(),
            action_cue: "Action: Take one small step forward today.".to_string(),
            journal_prompt: "What does this dynamic reveal about your path?".to_string(),
        }
    }
}

impl InsightProvider for PlaceholderProvider {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn generate(
        &self,
        signal: &str,
        modulator: &str,
    ) -> BoxFuture<'static, Result<Insight, ProviderError>> {
        let delay = self.delay;
        let insight = Self::insight(signal, modulator);
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(insight)
        })
    }
}
