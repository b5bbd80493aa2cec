use crate::cache::{MetadataCache, DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::fetch::{DirectFetcher, PageFetcher};
use crate::proxy::ProxyFetcher;
use async_trait::async_trait;
use linkmint_core::strategy::{self, Strategy};
use linkmint_core::{Clock, PageMetadata, SourceUrl, SystemClock};
use linkmint_extract::video;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use typed_builder::TypedBuilder;
use url::Url;

/// Caller-supplied context for a resolution: what the hosting environment
/// already knows about the page. `page_html` is a serialized DOM snapshot
/// when the page is loaded in a live context, the most reliable source
/// since it reflects rendered state rather than raw markup.
#[derive(Debug, Clone, Default)]
pub struct ResolveHints {
    pub title: Option<String>,
    pub favicon: Option<String>,
    pub page_html: Option<String>,
}

/// Tunables for the resolution pipeline.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ResolveConfig {
    /// Budget for parsing a supplied DOM snapshot.
    #[builder(default = Duration::from_secs(5))]
    pub snapshot_budget: Duration,
    /// Budget for the direct page fetch.
    #[builder(default = Duration::from_secs(12))]
    pub fetch_budget: Duration,
    /// Budget for the proxy-relayed fetch (all relays together).
    #[builder(default = Duration::from_secs(10))]
    pub proxy_budget: Duration,
    #[builder(default = DEFAULT_TTL)]
    pub cache_ttl: Duration,
    #[builder(default = DEFAULT_CAPACITY)]
    pub cache_capacity: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The metadata resolution pipeline.
///
/// `resolve` is total: it always returns a record, in the worst case
/// synthesized from the caller's hints and the URL itself.
#[derive(Clone)]
pub struct MetadataResolver {
    cache: MetadataCache,
    direct: Arc<dyn PageFetcher>,
    proxy: Arc<dyn PageFetcher>,
    config: ResolveConfig,
}

impl MetadataResolver {
    /// Builds a resolver over real HTTP fetchers sharing one client.
    pub fn new(client: reqwest::Client, config: ResolveConfig) -> Self {
        Self::with_fetchers(
            Arc::new(DirectFetcher::new(client.clone())),
            Arc::new(ProxyFetcher::new(client)),
            config,
            Arc::new(SystemClock),
        )
    }

    /// Fully injected constructor, used by tests and by callers that want
    /// custom relay ladders or clocks.
    pub fn with_fetchers(
        direct: Arc<dyn PageFetcher>,
        proxy: Arc<dyn PageFetcher>,
        config: ResolveConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = MetadataCache::new(config.cache_ttl, config.cache_capacity, clock);
        Self {
            cache,
            direct,
            proxy,
            config,
        }
    }

    pub async fn resolve(&self, url: &SourceUrl, hints: ResolveHints) -> PageMetadata {
        if let Some(cached) = self.cache.get(url.as_str()) {
            return cached;
        }

        let input = ResolveInput {
            url: url.as_url().clone(),
            snapshot: hints.page_html.clone(),
        };

        let mut strategies: Vec<Arc<dyn Strategy<ResolveInput, PageMetadata>>> = Vec::new();
        if input.snapshot.is_some() {
            strategies.push(Arc::new(SnapshotParse {
                budget: self.config.snapshot_budget,
            }));
        }
        strategies.push(Arc::new(FetchAndParse {
            name: "direct-fetch",
            fetcher: Arc::clone(&self.direct),
            budget: self.config.fetch_budget,
        }));
        strategies.push(Arc::new(FetchAndParse {
            name: "proxy-fetch",
            fetcher: Arc::clone(&self.proxy),
            budget: self.config.proxy_budget,
        }));

        let resolved =
            strategy::run_ordered(&strategies, &input, PageMetadata::is_sufficient).await;

        let record = match resolved {
            Some(record) => {
                info!(url = %url, title = %record.title, "metadata resolved");
                record
            }
            None => {
                debug!(url = %url, "all strategies failed, falling back to hints");
                fallback_record(url, &hints)
            }
        };

        if record.is_sufficient() {
            self.cache.insert(url.as_str(), record.clone());
        }
        record
    }
}

/// Minimal record built from caller hints and the URL alone. Video-host
/// URLs still get their thumbnail-CDN treatment here, since that needs no
/// network at all.
fn fallback_record(url: &SourceUrl, hints: &ResolveHints) -> PageMetadata {
    let base = video::is_video_host(url.as_url())
        .then(|| video::extract(url.as_url(), None))
        .flatten()
        .unwrap_or_default();

    let hinted = PageMetadata {
        title: hints.title.clone().unwrap_or_default(),
        favicon: hints.favicon.clone().unwrap_or_default(),
        ..Default::default()
    };

    let derived = PageMetadata {
        title: url.derived_title(),
        favicon: url.default_favicon(),
        ..Default::default()
    };

    hinted.or_else_from(&base).or_else_from(&derived)
}

#[derive(Debug, Clone)]
struct ResolveInput {
    url: Url,
    snapshot: Option<String>,
}

/// Parses the caller-supplied DOM snapshot with the shared extractor.
struct SnapshotParse {
    budget: Duration,
}

#[async_trait]
impl Strategy<ResolveInput, PageMetadata> for SnapshotParse {
    fn name(&self) -> &str {
        "page-snapshot"
    }

    fn budget(&self) -> Duration {
        self.budget
    }

    async fn attempt(&self, input: &ResolveInput) -> Option<PageMetadata> {
        let html = input.snapshot.as_deref()?;
        Some(linkmint_extract::extract(html, &input.url))
    }
}

/// Fetches markup through a [`PageFetcher`] and parses it.
struct FetchAndParse {
    name: &'static str,
    fetcher: Arc<dyn PageFetcher>,
    budget: Duration,
}

#[async_trait]
impl Strategy<ResolveInput, PageMetadata> for FetchAndParse {
    fn name(&self) -> &str {
        self.name
    }

    fn budget(&self) -> Duration {
        self.budget
    }

    async fn attempt(&self, input: &ResolveInput) -> Option<PageMetadata> {
        match self.fetcher.fetch_html(input.url.as_str()).await {
            Ok(html) => Some(linkmint_extract::extract(&html, &input.url)),
            Err(e) => {
                debug!(strategy = self.name, error = %e, "fetch failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use jiff::Timestamp;
    use linkmint_core::ManualClock;

    /// A fetcher with a fixed outcome.
    struct Canned(Result<String, FetchError>);

    #[async_trait]
    impl PageFetcher for Canned {
        async fn fetch_html(&self, _url: &str) -> Result<String, FetchError> {
            self.0.clone()
        }
    }

    fn resolver(
        direct: Result<String, FetchError>,
        proxy: Result<String, FetchError>,
    ) -> MetadataResolver {
        MetadataResolver::with_fetchers(
            Arc::new(Canned(direct)),
            Arc::new(Canned(proxy)),
            ResolveConfig::default(),
            Arc::new(ManualClock::new(Timestamp::UNIX_EPOCH)),
        )
    }

    fn failing() -> Result<String, FetchError> {
        Err(FetchError::Status(403))
    }

    fn page(title: &str) -> Result<String, FetchError> {
        Ok(format!(
            r#"<html><head>
                <meta property="og:title" content="{}">
                <meta property="og:description" content="a description">
            </head></html>"#,
            title
        ))
    }

    fn source() -> SourceUrl {
        SourceUrl::new("https://example.com/a/b").unwrap()
    }

    #[tokio::test]
    async fn snapshot_wins_over_fetch() {
        let resolver = resolver(page("Fetched"), failing());
        let hints = ResolveHints {
            page_html: Some(
                r#"<html><head>
                    <meta property="og:title" content="Snapshot">
                    <meta property="og:description" content="from the live page">
                </head></html>"#
                    .to_string(),
            ),
            ..Default::default()
        };

        let meta = resolver.resolve(&source(), hints).await;
        assert_eq!(meta.title, "Snapshot");
    }

    #[tokio::test]
    async fn direct_fetch_is_used_without_snapshot() {
        let resolver = resolver(page("Fetched"), failing());
        let meta = resolver.resolve(&source(), ResolveHints::default()).await;
        assert_eq!(meta.title, "Fetched");
    }

    #[tokio::test]
    async fn proxy_covers_direct_failures() {
        let resolver = resolver(failing(), page("Via Proxy"));
        let meta = resolver.resolve(&source(), ResolveHints::default()).await;
        assert_eq!(meta.title, "Via Proxy");
    }

    #[tokio::test]
    async fn total_failure_still_returns_a_record() {
        let resolver = resolver(failing(), failing());
        let meta = resolver.resolve(&source(), ResolveHints::default()).await;

        assert_eq!(meta.title, "example.com: a - b");
        assert_eq!(meta.favicon, "https://example.com/favicon.ico");
    }

    #[tokio::test]
    async fn hints_take_precedence_in_fallback() {
        let resolver = resolver(failing(), failing());
        let hints = ResolveHints {
            title: Some("Tab Title".to_string()),
            favicon: Some("https://example.com/tab.ico".to_string()),
            ..Default::default()
        };

        let meta = resolver.resolve(&source(), hints).await;
        assert_eq!(meta.title, "Tab Title");
        assert_eq!(meta.favicon, "https://example.com/tab.ico");
    }

    #[tokio::test]
    async fn video_urls_fall_back_to_thumbnail_cdn() {
        let resolver = resolver(failing(), failing());
        let url = SourceUrl::new("https://youtu.be/dQw4w9WgXcQ").unwrap();

        let meta = resolver.resolve(&url, ResolveHints::default()).await;
        assert_eq!(meta.site_name, "YouTube");
        assert_eq!(meta.image, "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg");
    }

    #[tokio::test]
    async fn sufficient_results_are_cached() {
        let resolver = resolver(page("Cached Once"), failing());
        let meta = resolver.resolve(&source(), ResolveHints::default()).await;
        assert_eq!(meta.title, "Cached Once");

        // Second resolution must come from the cache even though the
        // "network" now fails.
        let resolver2 = MetadataResolver {
            direct: Arc::new(Canned(failing())),
            proxy: Arc::new(Canned(failing())),
            ..resolver
        };
        let meta = resolver2.resolve(&source(), ResolveHints::default()).await;
        assert_eq!(meta.title, "Cached Once");
    }
}
