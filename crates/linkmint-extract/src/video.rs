use crate::text::{clean, MAX_DESCRIPTION_LEN, MAX_TEXT_LEN};
use linkmint_core::PageMetadata;
use scraper::{Html, Selector};
use url::Url;

/// YouTube serves previews from a predictable thumbnail CDN, so watch
/// pages are handled off the video id instead of scraped markup.
const THUMBNAIL_CDN: &str = "https://i.ytimg.com/vi";

/// Fixed favicon for the platform; watch pages don't carry a usable one.
const YOUTUBE_FAVICON: &str =
    "https://www.youtube.com/s/desktop/d743f786/img/favicon_144x144.png";

/// Whether this URL belongs to a known video host.
pub fn is_video_host(url: &Url) -> bool {
    matches!(
        url.host_str(),
        Some("youtube.com" | "www.youtube.com" | "m.youtube.com" | "youtu.be")
    )
}

/// Extracts the canonical video id from the various YouTube URL shapes:
/// `watch?v=`, `youtu.be/`, `/embed/`, `/shorts/`.
pub fn video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;

    if host == "youtu.be" {
        return first_segment(url);
    }

    let path = url.path();
    if path.starts_with("/watch") {
        return url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty());
    }
    if let Some(rest) = path.strip_prefix("/embed/") {
        return non_empty(rest.split('/').next());
    }
    if let Some(rest) = path.strip_prefix("/shorts/") {
        return non_empty(rest.split('/').next());
    }

    None
}

/// Builds a metadata record for a video URL. When page markup is
/// available the title/description/author come from it; otherwise the
/// record is synthesized from the URL alone (with the lower-resolution
/// thumbnail, which the CDN always has).
pub fn extract(url: &Url, html: Option<&str>) -> Option<PageMetadata> {
    let id = video_id(url)?;

    let mut meta = PageMetadata {
        title: "YouTube Video".to_string(),
        site_name: "YouTube".to_string(),
        image: format!("{}/{}/hqdefault.jpg", THUMBNAIL_CDN, id),
        favicon: YOUTUBE_FAVICON.to_string(),
        video: url.to_string(),
        kind: "video.other".to_string(),
        locale: "en_US".to_string(),
        ..Default::default()
    };

    if let Some(html) = html {
        let doc = Html::parse_document(html);
        if let Some(title) = page_title(&doc) {
            meta.title = title;
        }
        if let Some(description) = meta_any(&doc, "og:description")
            .or_else(|| meta_any(&doc, "twitter:description"))
            .or_else(|| meta_any(&doc, "description"))
        {
            meta.description = clean(&description, MAX_DESCRIPTION_LEN);
        }
        if let Some(author) = meta_any(&doc, "author") {
            meta.author = clean(&author, MAX_TEXT_LEN);
        }
        // With markup in hand the highest-resolution thumbnail is a safe bet.
        meta.image = format!("{}/{}/maxresdefault.jpg", THUMBNAIL_CDN, id);
    }

    Some(meta)
}

fn page_title(doc: &Html) -> Option<String> {
    let from_meta = meta_any(doc, "og:title")
        .or_else(|| meta_any(doc, "twitter:title"))
        .or_else(|| meta_any(doc, "title"));
    let raw = from_meta.or_else(|| {
        let sel = Selector::parse("title").ok()?;
        let element = doc.select(&sel).next()?;
        Some(element.text().collect::<String>())
    })?;

    let cleaned = clean(raw.trim_end().strip_suffix(" - YouTube").unwrap_or(&raw), MAX_TEXT_LEN);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn meta_any(doc: &Html, key: &str) -> Option<String> {
    for attr in ["property", "name"] {
        let Ok(sel) = Selector::parse(&format!("meta[{}=\"{}\"]", attr, key)) else {
            continue;
        };
        if let Some(element) = doc.select(&sel).next() {
            if let Some(content) = element.value().attr("content") {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
    }
    None
}

fn first_segment(url: &Url) -> Option<String> {
    non_empty(url.path_segments().and_then(|mut s| s.next()))
}

fn non_empty(segment: Option<&str>) -> Option<String> {
    segment
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}
