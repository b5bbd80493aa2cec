use serde::{Deserialize, Serialize};

/// Preview metadata scraped from a page.
///
/// Every field defaults to the empty string; a record is never "missing",
/// only more or less complete. `image` and `favicon`, when non-empty, are
/// absolute http(s) URLs; extraction resolves relative references against
/// the source page before a record is handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub image: String,
    pub favicon: String,
    pub site_name: String,
    pub video: String,
    /// Open Graph `og:type`, e.g. `website` or `video.other`.
    pub kind: String,
    pub locale: String,
    pub author: String,
    pub published_time: String,
    pub canonical_url: String,
    pub language: String,
}

impl PageMetadata {
    /// Whether this record is complete enough to stop trying further
    /// extraction strategies: a non-empty title plus at least one of
    /// description, image, or favicon.
    pub fn is_sufficient(&self) -> bool {
        !self.title.is_empty()
            && (!self.description.is_empty()
                || !self.image.is_empty()
                || !self.favicon.is_empty())
    }

    /// Fills empty fields from `other`, keeping existing values.
    pub fn or_else_from(mut self, other: &PageMetadata) -> Self {
        let fill = |dst: &mut String, src: &str| {
            if dst.is_empty() && !src.is_empty() {
                *dst = src.to_string();
            }
        };
        fill(&mut self.title, &other.title);
        fill(&mut self.description, &other.description);
        fill(&mut self.image, &other.image);
        fill(&mut self.favicon, &other.favicon);
        fill(&mut self.site_name, &other.site_name);
        fill(&mut self.video, &other.video);
        fill(&mut self.kind, &other.kind);
        fill(&mut self.locale, &other.locale);
        fill(&mut self.author, &other.author);
        fill(&mut self.published_time, &other.published_time);
        fill(&mut self.canonical_url, &other.canonical_url);
        fill(&mut self.language, &other.language);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_is_not_sufficient() {
        assert!(!PageMetadata::default().is_sufficient());
    }

    #[test]
    fn title_alone_is_not_sufficient() {
        let meta = PageMetadata {
            title: "Hello".to_string(),
            ..Default::default()
        };
        assert!(!meta.is_sufficient());
    }

    #[test]
    fn title_plus_favicon_is_sufficient() {
        let meta = PageMetadata {
            title: "Hello".to_string(),
            favicon: "https://example.com/favicon.ico".to_string(),
            ..Default::default()
        };
        assert!(meta.is_sufficient());
    }

    #[test]
    fn description_without_title_is_not_sufficient() {
        let meta = PageMetadata {
            description: "some text".to_string(),
            ..Default::default()
        };
        assert!(!meta.is_sufficient());
    }

    #[test]
    fn merge_keeps_existing_fields() {
        let primary = PageMetadata {
            title: "Primary".to_string(),
            ..Default::default()
        };
        let backup = PageMetadata {
            title: "Backup".to_string(),
            favicon: "https://example.com/f.ico".to_string(),
            ..Default::default()
        };

        let merged = primary.or_else_from(&backup);
        assert_eq!(merged.title, "Primary");
        assert_eq!(merged.favicon, "https://example.com/f.ico");
    }
}
