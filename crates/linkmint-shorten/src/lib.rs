//! Multi-provider URL shortening.
//!
//! A pipeline of third-party shortening providers tried in priority order
//! (or raced in parallel), each bounded by its own timeout, with a locally
//! synthesized short code as the last resort. Shortening is a total
//! operation: callers always get a usable [`linkmint_core::ShortLink`].

pub mod error;
pub mod expand;
pub mod fallback;
pub mod pipeline;
pub mod provider;
pub mod transport;
pub mod validate;

pub use error::TransportError;
pub use fallback::FallbackGenerator;
pub use pipeline::{Orchestration, ShortenConfig, ShortenPipeline};
pub use provider::{default_providers, ProviderRequest, RequestMethod, ShortenProvider};
pub use transport::{HttpTransport, ProviderTransport};
