//! Fallback dispatch across an ordered list of providers.

use crate::error::{DispatchError, ProviderError};
use crate::provider::TextProvider;
use std::sync::Arc;

/// Tries providers in order and returns the first success.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackDispatcher;

impl FallbackDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Generate text with the first provider in `order` that succeeds.
    ///
    /// When every provider fails, only the last provider's error is returned.
    /// Earlier failures are logged at warn level and then dropped.
    pub async fn generate(
        &self,
        prompt: &str,
        order: &[Arc<dyn TextProvider>],
    ) -> Result<String, DispatchError> {
        let mut last_error: Option<ProviderError> = None;

        for (attempt, provider) in order.iter().enumerate() {
            match provider.generate(prompt).await {
                Ok(text) => {
                    if attempt > 0 {
                        tracing::info!(
                            provider = provider.name(),
                            attempt = attempt + 1,
                            "Fallback provider succeeded"
                        );
                    }
                    return Ok(text);
                }
                Err(err) => {
                    tracing::warn!(
                        provider = provider.name(),
                        kind = err.kind(),
                        attempt = attempt + 1,
                        of = order.len(),
                        "Provider failed: {}",
                        err
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.map_or(DispatchError::NoProviders, DispatchError::Provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider returning a canned outcome and counting its calls.
    struct Scripted {
        name: &'static str,
        outcome: Result<&'static str, u16>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(name: &'static str, text: &'static str) -> Arc<Self> {
            Arc::new(Self { name, outcome: Ok(text), calls: AtomicUsize::new(0) })
        }

        fn failing(name: &'static str, status: u16) -> Arc<Self> {
            Arc::new(Self { name, outcome: Err(status), calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextProvider for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(ProviderError::Upstream {
                    provider: self.name.to_string(),
                    status,
                    body: format!("{} down", self.name),
                }),
            }
        }
    }

    fn order(providers: &[&Arc<Scripted>]) -> Vec<Arc<dyn TextProvider>> {
        providers
            .iter()
            .map(|p| Arc::clone(*p) as Arc<dyn TextProvider>)
            .collect()
    }

    #[tokio::test]
    async fn returns_first_success_after_failures() {
        let a = Scripted::failing("A", 500);
        let b = Scripted::failing("B", 503);
        let c = Scripted::ok("C", "from C");

        let result = FallbackDispatcher::new()
            .generate("prompt", &order(&[&a, &b, &c]))
            .await;

        assert_eq!(result, Ok("from C".to_string()));
        assert_eq!((a.calls(), b.calls(), c.calls()), (1, 1, 1));
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let a = Scripted::ok("A", "from A");
        let b = Scripted::ok("B", "from B");

        let result = FallbackDispatcher::new()
            .generate("prompt", &order(&[&a, &b]))
            .await;

        assert_eq!(result, Ok("from A".to_string()));
        assert_eq!(b.calls(), 0);
    }

    #[tokio::test]
    async fn all_failing_returns_last_error() {
        let a = Scripted::failing("A", 500);
        let b = Scripted::failing("B", 401);

        let result = FallbackDispatcher::new()
            .generate("prompt", &order(&[&a, &b]))
            .await;

        assert_eq!(
            result,
            Err(DispatchError::Provider(ProviderError::Upstream {
                provider: "B".to_string(),
                status: 401,
                body: "B down".to_string(),
            }))
        );
    }

    #[tokio::test]
    async fn empty_order_is_configuration_error() {
        let result = FallbackDispatcher::new().generate("prompt", &[]).await;
        assert_eq!(result, Err(DispatchError::NoProviders));
    }

    #[tokio::test]
    async fn single_provider_is_pass_through() {
        let a = Scripted::failing("A", 502);

        let result = FallbackDispatcher::new()
            .generate("prompt", &order(&[&a]))
            .await;

        assert!(matches!(
            result,
            Err(DispatchError::Provider(ProviderError::Upstream { status: 502, .. }))
        ));
        assert_eq!(a.calls(), 1);
    }
}
