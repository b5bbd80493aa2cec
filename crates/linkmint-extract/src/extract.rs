use crate::absolute::absolutize;
use crate::text::{clean, MAX_DESCRIPTION_LEN, MAX_TEXT_LEN};
use crate::video;
use linkmint_core::PageMetadata;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Keywords that disqualify an `<img>` from serving as the preview image.
const IMAGE_EXCLUDE_KEYWORDS: &[&str] = &["pixel", "track", "icon", "logo", "avatar"];

/// Minimum declared width/height for a scanned `<img>` to qualify.
const MIN_IMAGE_DIMENSION: u32 = 100;

/// Paragraph length bounds for the description heuristic.
const MIN_PARAGRAPH_LEN: usize = 20;
const MAX_PARAGRAPH_LEN: usize = 300;

/// Extracts preview metadata from raw HTML against the page it was
/// fetched from.
///
/// Known video-hosting URLs skip generic extraction entirely and take the
/// thumbnail-CDN path instead (see [`video`]).
pub fn extract(html: &str, base: &Url) -> PageMetadata {
    if video::is_video_host(base) {
        if let Some(meta) = video::extract(base, Some(html)) {
            return meta;
        }
    }

    let doc = Html::parse_document(html);

    let title = title(&doc, base);
    let description = description(&doc);
    let image = image(&doc, base);
    let favicon = favicon(&doc, base);
    let site_name = site_name(&doc, base);

    PageMetadata {
        title: clean(&title, MAX_TEXT_LEN),
        description: clean(&description, MAX_DESCRIPTION_LEN),
        image,
        favicon,
        site_name: clean(&site_name, MAX_TEXT_LEN),
        video: meta_first(&doc, &["og:video", "og:video:url", "og:video:secure_url"])
            .unwrap_or_default(),
        kind: meta_first(&doc, &["og:type"]).unwrap_or_else(|| "website".to_string()),
        locale: meta_first(&doc, &["og:locale"]).unwrap_or_else(|| "en_US".to_string()),
        author: meta_first(&doc, &["author", "twitter:creator"]).unwrap_or_default(),
        published_time: meta_first(&doc, &["article:published_time", "og:published_time"])
            .unwrap_or_default(),
        canonical_url: link_href(&doc, &["link[rel=\"canonical\"]"]).unwrap_or_default(),
        language: html_lang(&doc).unwrap_or_default(),
    }
}

fn title(doc: &Html, base: &Url) -> String {
    if let Some(t) = meta_first(doc, &["og:title", "twitter:title", "title"]) {
        return t;
    }
    if let Some(t) = element_text(doc, "title") {
        return t;
    }
    if let Some(t) = element_text(doc, "h1") {
        return t;
    }
    derived_title(base)
}

/// Builds a readable label from the host and path, used when a page has no
/// title markup at all.
fn derived_title(base: &Url) -> String {
    let host = base.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        return "Untitled Page".to_string();
    }

    let path = base
        .path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" - ")
        })
        .unwrap_or_default();

    if path.is_empty() {
        host.to_string()
    } else {
        format!("{}: {}", host, path)
    }
}

fn description(doc: &Html) -> String {
    if let Some(d) = meta_first(doc, &["og:description", "twitter:description", "description"]) {
        return d;
    }

    // Heuristic fallback: first paragraph of plausible length.
    if let Ok(sel) = Selector::parse("p") {
        for p in doc.select(&sel) {
            let text = collect_text(&p);
            let len = text.chars().count();
            if len > MIN_PARAGRAPH_LEN && len < MAX_PARAGRAPH_LEN {
                return text;
            }
        }
    }

    String::new()
}

fn image(doc: &Html, base: &Url) -> String {
    let from_meta = meta_first(
        doc,
        &[
            "og:image",
            "og:image:url",
            "og:image:secure_url",
            "twitter:image",
            "twitter:image:src",
        ],
    )
    .or_else(|| link_href(doc, &["link[rel=\"image_src\"]"]));

    if let Some(img) = from_meta {
        return absolutize(&img, base);
    }

    scan_images(doc, base).unwrap_or_default()
}

/// Scans `<img>` elements for a plausible preview image: declared
/// dimensions above the minimum and a `src` free of tracking/branding
/// keywords. Raw markup carries no rendered sizes, so images without
/// width/height attributes are skipped.
fn scan_images(doc: &Html, base: &Url) -> Option<String> {
    let sel = Selector::parse("img[src]").ok()?;
    for img in doc.select(&sel) {
        let src = img.value().attr("src").unwrap_or_default();
        if src.is_empty() {
            continue;
        }
        let lowered = src.to_ascii_lowercase();
        if IMAGE_EXCLUDE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            continue;
        }
        let width = dimension(img.value().attr("width"));
        let height = dimension(img.value().attr("height"));
        if width > MIN_IMAGE_DIMENSION && height > MIN_IMAGE_DIMENSION {
            return Some(absolutize(src, base));
        }
    }
    None
}

fn dimension(attr: Option<&str>) -> u32 {
    attr.and_then(|v| v.trim().trim_end_matches("px").parse().ok())
        .unwrap_or(0)
}

fn favicon(doc: &Html, base: &Url) -> String {
    let selectors = [
        "link[rel=\"icon\"]",
        "link[rel=\"shortcut icon\"]",
        "link[rel=\"apple-touch-icon\"]",
        "link[rel=\"apple-touch-icon-precomposed\"]",
        "link[rel=\"mask-icon\"]",
    ];

    match link_href(doc, &selectors) {
        Some(href) => absolutize(&href, base),
        None => format!("{}/favicon.ico", base.origin().ascii_serialization()),
    }
}

fn site_name(doc: &Html, base: &Url) -> String {
    if let Some(name) = meta_first(
        doc,
        &["og:site_name", "application-name", "apple-mobile-web-app-title"],
    ) {
        return name;
    }

    // Capitalized first label of the hostname, e.g. "example.com" -> "Example".
    let host = base.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = host.split('.').next().unwrap_or_default();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First non-empty `content` among the given meta keys, in priority order.
/// Each key is tried as `meta[property=...]` and then `meta[name=...]`,
/// since pages are inconsistent about which attribute carries OG and
/// Twitter Card tags.
fn meta_first(doc: &Html, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(content) =
            meta_attr(doc, "property", key).or_else(|| meta_attr(doc, "name", key))
        {
            return Some(content);
        }
    }
    None
}

fn meta_attr(doc: &Html, attr: &str, value: &str) -> Option<String> {
    let sel = Selector::parse(&format!("meta[{}=\"{}\"]", attr, value)).ok()?;
    let element = doc.select(&sel).next()?;
    let content = element.value().attr("content")?.trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

fn link_href(doc: &Html, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        let Ok(sel) = Selector::parse(raw) else {
            continue;
        };
        if let Some(element) = doc.select(&sel).next() {
            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !href.is_empty() {
                    return Some(href.to_string());
                }
            }
        }
    }
    None
}

fn element_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let element = doc.select(&sel).next()?;
    let text = collect_text(&element);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn collect_text(element: &ElementRef<'_>) -> String {
    clean(&element.text().collect::<String>(), MAX_TEXT_LEN)
}

fn html_lang(doc: &Html) -> Option<String> {
    let sel = Selector::parse("html[lang]").ok()?;
    let element = doc.select(&sel).next()?;
    element.value().attr("lang").map(|l| l.trim().to_string())
}
