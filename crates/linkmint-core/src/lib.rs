//! Core types and traits for the linkmint link toolkit.
//!
//! This crate provides the shared data model (page metadata, short links,
//! history entries), the validated source-URL type, the clock abstraction,
//! and the ordered-strategy runner used by both the metadata-resolution
//! and URL-shortening pipelines.

pub mod clock;
pub mod error;
pub mod link;
pub mod metadata;
pub mod source;
pub mod strategy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CoreError;
pub use link::{HistoryEntry, ShortLink};
pub use metadata::PageMetadata;
pub use source::SourceUrl;
pub use strategy::Strategy;
