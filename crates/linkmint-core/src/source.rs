use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use url::Url;

/// A validated page URL that the pipelines accept as input.
///
/// Only absolute `http`/`https` URLs are allowed. Browser-internal schemes
/// (`chrome://`, `file://`, `about:` and friends) are rejected up front;
/// this is the one input error that is surfaced to callers instead of
/// being recovered from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceUrl(Url);

impl SourceUrl {
    /// Parses and validates a source URL.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(CoreError::InvalidUrl("url cannot be empty".to_string()));
        }

        let url = Url::parse(raw).map_err(|e| CoreError::InvalidUrl(format!("{}: {}", raw, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(CoreError::InvalidUrl(format!(
                    "scheme must be http or https, got {}",
                    scheme
                )));
            }
        }

        if url.host_str().is_none() {
            return Err(CoreError::InvalidUrl(format!("url has no host: {}", raw)));
        }

        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The URL's origin, e.g. `https://example.com`.
    pub fn origin(&self) -> String {
        self.0.origin().ascii_serialization()
    }

    /// Hostname with a leading `www.` stripped.
    pub fn display_host(&self) -> String {
        let host = self.0.host_str().unwrap_or_default();
        host.strip_prefix("www.").unwrap_or(host).to_string()
    }

    /// A human-readable label derived from the host and path, used when a
    /// page yields no usable title at all.
    pub fn derived_title(&self) -> String {
        let host = self.display_host();
        let path = self
            .0
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(" - ")
            })
            .unwrap_or_default();

        if path.is_empty() {
            host
        } else {
            format!("{}: {}", host, path)
        }
    }

    /// The conventional favicon location for this URL's origin.
    pub fn default_favicon(&self) -> String {
        format!("{}/favicon.ico", self.origin())
    }
}

impl Display for SourceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for SourceUrl {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceUrl> for String {
    fn from(value: SourceUrl) -> Self {
        value.0.into()
    }
}
