use crate::fallback::{FallbackGenerator, DEFAULT_BASE};
use crate::provider::{default_providers, ShortenProvider};
use crate::transport::ProviderTransport;
use crate::validate;
use async_trait::async_trait;
use linkmint_core::strategy::{self, Strategy};
use linkmint_core::{ShortLink, SourceUrl};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// Name reported on the `ShortLink` when the local fallback kicked in.
pub const FALLBACK_PROVIDER: &str = "fallback";

/// How providers are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orchestration {
    /// Fixed priority order, short-circuiting on the first valid answer.
    #[default]
    Sequential,
    /// All providers at once; first validated response wins.
    Race,
}

/// Tunables for the shortening pipeline.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenConfig {
    /// Wall-clock budget per provider attempt.
    #[builder(default = Duration::from_secs(6))]
    pub provider_timeout: Duration,
    #[builder(default)]
    pub orchestration: Orchestration,
    /// Base domain of synthesized fallback links.
    #[builder(default = DEFAULT_BASE.to_string())]
    pub fallback_base: String,
}

impl Default for ShortenConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The multi-provider shortening pipeline.
///
/// `shorten` is total: if every provider fails, times out, or returns an
/// invalid body, a locally synthesized placeholder link is returned
/// instead of an error.
#[derive(Clone)]
pub struct ShortenPipeline<T> {
    providers: Vec<Arc<dyn ShortenProvider>>,
    transport: Arc<T>,
    fallback: FallbackGenerator,
    config: ShortenConfig,
}

impl<T: ProviderTransport> ShortenPipeline<T> {
    /// Builds a pipeline over the default provider ladder.
    pub fn new(transport: T, config: ShortenConfig) -> Self {
        Self::with_providers(default_providers(), transport, config)
    }

    pub fn with_providers(
        providers: Vec<Arc<dyn ShortenProvider>>,
        transport: T,
        config: ShortenConfig,
    ) -> Self {
        let fallback = FallbackGenerator::new(config.fallback_base.clone());
        Self {
            providers,
            transport: Arc::new(transport),
            fallback,
            config,
        }
    }

    pub async fn shorten(&self, url: &SourceUrl) -> ShortLink {
        let strategies: Vec<Arc<dyn Strategy<String, ShortLink>>> = self
            .providers
            .iter()
            .map(|provider| {
                Arc::new(ProviderAttempt {
                    provider: Arc::clone(provider),
                    transport: Arc::clone(&self.transport),
                    timeout: self.config.provider_timeout,
                }) as Arc<dyn Strategy<String, ShortLink>>
            })
            .collect();

        let input = url.as_str().to_string();
        let result = match self.config.orchestration {
            Orchestration::Sequential => {
                strategy::run_ordered(&strategies, &input, |_| true).await
            }
            Orchestration::Race => {
                strategy::run_race(strategies, Arc::new(input), |_| true).await
            }
        };

        match result {
            Some(link) => {
                info!(provider = %link.provider, short_url = %link.short_url, "url shortened");
                link
            }
            None => {
                let short_url = self.fallback.generate();
                warn!(short_url = %short_url, "all providers failed, synthesized fallback link");
                ShortLink {
                    short_url,
                    provider: FALLBACK_PROVIDER.to_string(),
                }
            }
        }
    }
}

/// One provider bound to a transport, shaped as a pipeline strategy.
struct ProviderAttempt<T> {
    provider: Arc<dyn ShortenProvider>,
    transport: Arc<T>,
    timeout: Duration,
}

#[async_trait]
impl<T: ProviderTransport> Strategy<String, ShortLink> for ProviderAttempt<T> {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn budget(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, long_url: &String) -> Option<ShortLink> {
        let request = self.provider.request(long_url);
        let body = match self.transport.execute(&request).await {
            Ok(body) => body,
            Err(e) => {
                debug!(provider = self.provider.name(), error = %e, "provider call failed");
                return None;
            }
        };

        match validate::short_url(&body) {
            Some(short_url) => Some(ShortLink {
                short_url,
                provider: self.provider.name().to_string(),
            }),
            None => {
                debug!(provider = self.provider.name(), "provider response failed validation");
                None
            }
        }
    }
}
