//! Provider decorator that never fails.
//!
//! Any error from the wrapped provider is logged and replaced with
//! [`Insight::fallback`] for the same pair, so a request always ends on a card.

use futures_util::future::BoxFuture;

use crate::{Insight, InsightProvider, ProviderError};

#[derive(Debug, Clone)]
pub struct WithFallback<P> {
    inner: P,
}

impl<P> WithFallback<P> {
    #[must_use]
    pub const fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: InsightProvider> InsightProvider for WithFallback<P> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn generate(
        &self,
        signal: &str,
        modulator: &str,
    ) -> BoxFuture<'static, Result<Insight, ProviderError>> {
        let provider = self.inner.name();
        let request = self.inner.generate(signal, modulator);
        let signal = signal.to_string();
        let modulator = modulator.to_string();
        Box::pin(async move {
            match request.await {
                Ok(insight) => Ok(insight),
                Err(e) => {
                    tracing::warn!(
                        provider,
                        signal = %signal,
                        modulator = %modulator,
                        "Insight generation failed, using fallback: {e}"
                    );
                    Ok(Insight::fallback(&signal, &modulator))
                }
            }
        })
    }
}
