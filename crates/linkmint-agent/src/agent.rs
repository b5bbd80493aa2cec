use crate::message::{Request, Response};
use linkmint_core::{Clock, HistoryEntry, PageMetadata, ShortLink, SourceUrl, SystemClock};
use linkmint_history::{HistoryStore, StateStore};
use linkmint_resolve::{MetadataResolver, ResolveConfig, ResolveHints};
use linkmint_shorten::{expand, HttpTransport, ProviderTransport, ShortenConfig, ShortenPipeline};
use std::sync::Arc;
use tracing::warn;

/// Tunables for both pipelines behind one agent.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    pub shorten: ShortenConfig,
    pub resolve: ResolveConfig,
}

/// The message-dispatch surface hosts embed.
///
/// Owns the two pipelines and the history; `dispatch` maps each request
/// action onto them. Invalid (non-http) input is the only rejection that
/// surfaces as a failure response. Both pipelines are total, and a history
/// persistence problem downgrades to a warning rather than failing a
/// shorten that already succeeded.
pub struct LinkAgent<S, T = HttpTransport> {
    resolver: MetadataResolver,
    shortener: ShortenPipeline<T>,
    history: HistoryStore<S>,
    client: reqwest::Client,
    clock: Arc<dyn Clock>,
}

impl<S: StateStore> LinkAgent<S> {
    /// Builds an agent over real HTTP, sharing one client everywhere.
    pub fn new(client: reqwest::Client, history: HistoryStore<S>, config: AgentConfig) -> Self {
        Self::with_parts(
            MetadataResolver::new(client.clone(), config.resolve),
            ShortenPipeline::new(HttpTransport::new(client.clone()), config.shorten),
            history,
            client,
            Arc::new(SystemClock),
        )
    }
}

impl<S: StateStore, T: ProviderTransport> LinkAgent<S, T> {
    /// Fully injected constructor, used by tests and embedders with custom
    /// transports or fetchers.
    pub fn with_parts(
        resolver: MetadataResolver,
        shortener: ShortenPipeline<T>,
        history: HistoryStore<S>,
        client: reqwest::Client,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            shortener,
            history,
            client,
            clock,
        }
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub async fn dispatch(&self, request: Request) -> Response {
        match request {
            Request::ShortenUrl { url } => self.shorten(&url).await,
            Request::FetchMetadata {
                url,
                title,
                favicon,
                page_html,
            } => {
                self.fetch_metadata(
                    &url,
                    ResolveHints {
                        title,
                        favicon,
                        page_html,
                    },
                )
                .await
            }
            Request::ResolveShortUrl { url } => self.resolve_short(&url).await,
            Request::ShortenAndFetchMetadata {
                url,
                title,
                favicon,
                page_html,
            } => {
                self.shorten_and_fetch(
                    &url,
                    ResolveHints {
                        title,
                        favicon,
                        page_html,
                    },
                )
                .await
            }
        }
    }

    async fn shorten(&self, url: &str) -> Response {
        let source = match SourceUrl::new(url) {
            Ok(source) => source,
            Err(e) => return Response::failure(e.to_string()),
        };
        let link = self.shortener.shorten(&source).await;
        Response::ShortLink {
            success: true,
            short_url: link.short_url,
            provider: link.provider,
        }
    }

    async fn fetch_metadata(&self, url: &str, hints: ResolveHints) -> Response {
        let source = match SourceUrl::new(url) {
            Ok(source) => source,
            Err(e) => return Response::failure(e.to_string()),
        };
        let metadata = self.resolver.resolve(&source, hints).await;
        Response::Metadata {
            success: true,
            metadata,
        }
    }

    async fn resolve_short(&self, url: &str) -> Response {
        match expand::expand(&self.client, url).await {
            Ok(resolved_url) => Response::Resolved {
                success: true,
                resolved_url,
            },
            Err(e) => Response::failure(e.to_string()),
        }
    }

    /// The combined popup flow: both pipelines run concurrently and the
    /// merged record lands in the history.
    async fn shorten_and_fetch(&self, url: &str, hints: ResolveHints) -> Response {
        let source = match SourceUrl::new(url) {
            Ok(source) => source,
            Err(e) => return Response::failure(e.to_string()),
        };

        let (link, metadata) = tokio::join!(
            self.shortener.shorten(&source),
            self.resolver.resolve(&source, hints),
        );

        let entry = self.record(&source, &link, &metadata).await;
        Response::Record {
            success: true,
            entry,
        }
    }

    async fn record(
        &self,
        source: &SourceUrl,
        link: &ShortLink,
        metadata: &PageMetadata,
    ) -> HistoryEntry {
        match self
            .history
            .record_shorten(source.as_str(), &link.short_url, metadata)
            .await
        {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "history write failed, returning unrecorded entry");
                HistoryEntry::new(
                    source.as_str(),
                    &link.short_url,
                    metadata,
                    self.clock.now(),
                )
            }
        }
    }
}
