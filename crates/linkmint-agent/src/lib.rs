//! Process-boundary adapter over the linkmint pipelines.
//!
//! Hosts embed the library through [`LinkAgent`]: a JSON message protocol
//! (`action`-discriminated requests, `success`-flagged responses) dispatched
//! onto the shortening and metadata pipelines, with every shorten recorded
//! in the bounded history. Share-intent and QR image URL builders live here
//! too, since they are presentation concerns rather than pipeline ones.

pub mod agent;
pub mod message;
pub mod share;

pub use agent::{AgentConfig, LinkAgent};
pub use message::{Request, Response};
pub use share::{qr_image_url, share_url, ShareTarget};
