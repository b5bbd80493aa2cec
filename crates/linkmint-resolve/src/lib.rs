//! Metadata resolution pipeline.
//!
//! Orchestrates several independent extraction strategies in a fallback
//! order (page-snapshot parse, direct fetch, proxy-relayed fetch, hint
//! fallback), each under its own timeout, backed by a time-bounded cache.
//! Resolution is total: callers always get a [`linkmint_core::PageMetadata`].

pub mod cache;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod proxy;

pub use cache::MetadataCache;
pub use error::FetchError;
pub use fetch::{DirectFetcher, PageFetcher};
pub use pipeline::{MetadataResolver, ResolveConfig, ResolveHints};
pub use proxy::ProxyFetcher;
