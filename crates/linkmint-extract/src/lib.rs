//! Pure HTML-to-metadata extraction.
//!
//! Everything in this crate is a function of `(html, base url)` with no
//! I/O, so the same extractor backs both raw fetched markup and serialized
//! DOM snapshots handed over by a live page context.

pub mod absolute;
pub mod extract;
pub mod text;
pub mod video;

pub use absolute::absolutize;
pub use extract::extract;
