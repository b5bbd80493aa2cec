use linkmint_core::{HistoryEntry, PageMetadata};
use serde::{Deserialize, Serialize};

/// An incoming message, discriminated by its `action` field.
///
/// The optional tab fields on the metadata-bearing actions are hints from
/// the hosting environment: the title and favicon it already knows, and a
/// serialized DOM snapshot when the page is loaded in a live context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    ShortenUrl {
        url: String,
    },
    FetchMetadata {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        favicon: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        page_html: Option<String>,
    },
    ResolveShortUrl {
        url: String,
    },
    ShortenAndFetchMetadata {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        favicon: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        page_html: Option<String>,
    },
}

/// The reply to a [`Request`].
///
/// Every variant carries `success`; the shape of the rest depends on the
/// action. Deserialization is untagged, so `Failure` must stay first: it is
/// the only variant with an `error` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum Response {
    Failure {
        success: bool,
        error: String,
    },
    ShortLink {
        success: bool,
        short_url: String,
        provider: String,
    },
    Metadata {
        success: bool,
        metadata: PageMetadata,
    },
    Resolved {
        success: bool,
        resolved_url: String,
    },
    Record {
        success: bool,
        entry: HistoryEntry,
    },
}

impl Response {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Failure { success, .. }
            | Self::ShortLink { success, .. }
            | Self::Metadata { success, .. }
            | Self::Resolved { success, .. }
            | Self::Record { success, .. } => *success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tag_selects_the_variant() {
        let request: Request = serde_json::from_str(
            r#"{"action":"shortenUrl","url":"https://example.com"}"#,
        )
        .unwrap();
        assert!(matches!(request, Request::ShortenUrl { url } if url == "https://example.com"));
    }

    #[test]
    fn tab_hints_are_optional() {
        let request: Request = serde_json::from_str(
            r#"{"action":"fetchMetadata","url":"https://example.com"}"#,
        )
        .unwrap();
        match request {
            Request::FetchMetadata {
                title,
                favicon,
                page_html,
                ..
            } => {
                assert!(title.is_none());
                assert!(favicon.is_none());
                assert!(page_html.is_none());
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn hint_fields_use_camel_case() {
        let request: Request = serde_json::from_str(
            r#"{"action":"shortenAndFetchMetadata","url":"https://example.com","pageHtml":"<html></html>","title":"T"}"#,
        )
        .unwrap();
        match request {
            Request::ShortenAndFetchMetadata {
                title, page_html, ..
            } => {
                assert_eq!(title.as_deref(), Some("T"));
                assert_eq!(page_html.as_deref(), Some("<html></html>"));
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let result: Result<Request, _> =
            serde_json::from_str(r#"{"action":"selfDestruct","url":"https://example.com"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn responses_serialize_flat() {
        let response = Response::ShortLink {
            success: true,
            short_url: "https://is.gd/abc".to_string(),
            provider: "is.gd".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["shortUrl"], "https://is.gd/abc");
        assert_eq!(json["provider"], "is.gd");
    }

    #[test]
    fn failure_round_trips() {
        let json = serde_json::to_string(&Response::failure("invalid URL")).unwrap();
        let back: Response = serde_json::from_str(&json).unwrap();
        assert!(!back.is_success());
        assert!(matches!(back, Response::Failure { error, .. } if error == "invalid URL"));
    }
}
