use std::sync::Arc;
use url::form_urlencoded;

/// How a provider wants to be called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    /// POST with a form-encoded body.
    PostForm,
}

/// A fully described provider call: endpoint, method, and (for POST) the
/// form fields. All providers speak plain text, so `Accept: text/plain`
/// is sent across the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub endpoint: String,
    pub method: RequestMethod,
    pub form: Vec<(String, String)>,
}

impl ProviderRequest {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: RequestMethod::Get,
            form: Vec::new(),
        }
    }

    pub fn post_form(endpoint: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: RequestMethod::PostForm,
            form,
        }
    }
}

/// A third-party shortening service: a name plus a request template.
/// Response validation is shared across providers (see [`crate::validate`]).
pub trait ShortenProvider: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Builds the request that asks this provider to shorten `long_url`.
    fn request(&self, long_url: &str) -> ProviderRequest;
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// `is.gd` simple-format API.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsGd;

impl ShortenProvider for IsGd {
    fn name(&self) -> &'static str {
        "is.gd"
    }

    fn request(&self, long_url: &str) -> ProviderRequest {
        ProviderRequest::get(format!(
            "https://is.gd/create.php?format=simple&url={}",
            encode(long_url)
        ))
    }
}

/// `v.gd`, the sister service of is.gd. Same API, but exercised through a
/// form-encoded POST, which the endpoint accepts equally.
#[derive(Debug, Clone, Copy, Default)]
pub struct VGd;

impl ShortenProvider for VGd {
    fn name(&self) -> &'static str {
        "v.gd"
    }

    fn request(&self, long_url: &str) -> ProviderRequest {
        ProviderRequest::post_form(
            "https://v.gd/create.php",
            vec![
                ("format".to_string(), "simple".to_string()),
                ("url".to_string(), long_url.to_string()),
            ],
        )
    }
}

/// TinyURL's classic plain-text API.
#[derive(Debug, Clone, Copy, Default)]
pub struct TinyUrl;

impl ShortenProvider for TinyUrl {
    fn name(&self) -> &'static str {
        "TinyURL"
    }

    fn request(&self, long_url: &str) -> ProviderRequest {
        ProviderRequest::get(format!(
            "https://tinyurl.com/api-create.php?url={}",
            encode(long_url)
        ))
    }
}

/// The default provider ladder, in priority order.
pub fn default_providers() -> Vec<Arc<dyn ShortenProvider>> {
    vec![Arc::new(IsGd), Arc::new(VGd), Arc::new(TinyUrl)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_gd_encodes_the_url() {
        let req = IsGd.request("https://example.com/a?b=c&d=e");
        assert_eq!(req.method, RequestMethod::Get);
        assert!(req.endpoint.starts_with("https://is.gd/create.php?format=simple&url="));
        assert!(req.endpoint.contains("%3A%2F%2F"));
        assert!(!req.endpoint.contains("a?b"));
    }

    #[test]
    fn v_gd_posts_a_form() {
        let req = VGd.request("https://example.com");
        assert_eq!(req.method, RequestMethod::PostForm);
        assert_eq!(req.endpoint, "https://v.gd/create.php");
        assert!(req
            .form
            .contains(&("url".to_string(), "https://example.com".to_string())));
    }

    #[test]
    fn default_ladder_order() {
        let providers = default_providers();
        let names: Vec<_> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["is.gd", "v.gd", "TinyURL"]);
    }
}
