use crate::metadata::PageMetadata;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The outcome of shortening a URL.
///
/// `short_url` always parses as an absolute http(s) URL. When every
/// provider fails, the pipeline substitutes a locally synthesized
/// placeholder (provider name `fallback`) rather than returning an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub short_url: String,
    /// Name of the provider that produced the link, e.g. `is.gd`.
    pub provider: String,
}

/// One past shortening event, as stored in the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Dedup key: re-shortening the same original URL updates the
    /// existing entry in place instead of adding a second one.
    pub original_url: String,
    pub short_url: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub favicon: String,
    pub timestamp: Timestamp,
    /// Starts at 1 on first shorten, incremented on every repeat.
    pub click_count: u32,
}

impl HistoryEntry {
    /// Builds a fresh entry from a shorten result and its metadata.
    pub fn new(
        original_url: impl Into<String>,
        short_url: impl Into<String>,
        metadata: &PageMetadata,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            original_url: original_url.into(),
            short_url: short_url.into(),
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            image: metadata.image.clone(),
            favicon: metadata.favicon.clone(),
            timestamp,
            click_count: 1,
        }
    }

    /// Refreshes an existing entry after a repeat shorten of the same
    /// original URL: metadata and short link are replaced, the timestamp
    /// is reset, and the counter goes up by one.
    pub fn refresh(
        &mut self,
        short_url: impl Into<String>,
        metadata: &PageMetadata,
        timestamp: Timestamp,
    ) {
        self.short_url = short_url.into();
        self.title = metadata.title.clone();
        self.description = metadata.description.clone();
        self.image = metadata.image.clone();
        self.favicon = metadata.favicon.clone();
        self.timestamp = timestamp;
        self.click_count += 1;
    }
}
