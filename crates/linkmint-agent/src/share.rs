use url::Url;

/// Social networks with a share-intent URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    Twitter,
    Telegram,
    WhatsApp,
    Reddit,
    Facebook,
    Bluesky,
    Threads,
}

const QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_QR_SIZE: u32 = 200;

/// Builds the share-intent URL that opens `target`'s composer prefilled
/// with the link. Pure string construction, no network.
pub fn share_url(target: ShareTarget, url: &str, title: &str) -> String {
    let intent = match target {
        ShareTarget::Twitter => {
            let mut u = base("https://twitter.com/intent/tweet");
            u.query_pairs_mut()
                .append_pair("text", title)
                .append_pair("url", url);
            u
        }
        ShareTarget::Telegram => {
            let mut u = base("https://t.me/share/url");
            u.query_pairs_mut()
                .append_pair("url", url)
                .append_pair("text", title);
            u
        }
        ShareTarget::WhatsApp => {
            let mut u = base("https://wa.me/");
            u.query_pairs_mut()
                .append_pair("text", &with_title(title, url));
            u
        }
        ShareTarget::Reddit => {
            let mut u = base("https://www.reddit.com/submit");
            u.query_pairs_mut()
                .append_pair("url", url)
                .append_pair("title", title);
            u
        }
        ShareTarget::Facebook => {
            let mut u = base("https://www.facebook.com/sharer/sharer.php");
            u.query_pairs_mut().append_pair("u", url);
            u
        }
        ShareTarget::Bluesky => {
            let mut u = base("https://bsky.app/intent/compose");
            u.query_pairs_mut()
                .append_pair("text", &with_title(title, url));
            u
        }
        ShareTarget::Threads => {
            let mut u = base("https://www.threads.net/intent/post");
            u.query_pairs_mut()
                .append_pair("text", &with_title(title, url));
            u
        }
    };
    intent.to_string()
}

/// URL of a rendered QR code image for `data`, `size` pixels square.
pub fn qr_image_url(data: &str, size: u32) -> String {
    let mut u = base(QR_ENDPOINT);
    u.query_pairs_mut()
        .append_pair("size", &format!("{}x{}", size, size))
        .append_pair("data", data);
    u.to_string()
}

fn with_title(title: &str, url: &str) -> String {
    if title.is_empty() {
        url.to_string()
    } else {
        format!("{} {}", title, url)
    }
}

fn base(endpoint: &str) -> Url {
    // The endpoints are compile-time constants and always parse.
    Url::parse(endpoint).expect("share endpoint is a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitter_carries_text_and_url() {
        let intent = share_url(
            ShareTarget::Twitter,
            "https://is.gd/abc",
            "A Great Page",
        );
        assert!(intent.starts_with("https://twitter.com/intent/tweet?"));
        assert!(intent.contains("text=A+Great+Page"));
        assert!(intent.contains("url=https%3A%2F%2Fis.gd%2Fabc"));
    }

    #[test]
    fn facebook_only_needs_the_url() {
        let intent = share_url(ShareTarget::Facebook, "https://is.gd/abc", "ignored");
        assert_eq!(
            intent,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fis.gd%2Fabc"
        );
    }

    #[test]
    fn whatsapp_joins_title_and_url() {
        let intent = share_url(ShareTarget::WhatsApp, "https://is.gd/abc", "Hello");
        assert!(intent.contains("text=Hello+https%3A%2F%2Fis.gd%2Fabc"));
    }

    #[test]
    fn empty_title_degrades_to_url_only() {
        let intent = share_url(ShareTarget::Bluesky, "https://is.gd/abc", "");
        assert!(intent.contains("text=https%3A%2F%2Fis.gd%2Fabc"));
        assert!(!intent.contains("text=+"));
    }

    #[test]
    fn qr_url_is_square_and_encoded() {
        let qr = qr_image_url("https://is.gd/abc", 300);
        assert!(qr.starts_with("https://api.qrserver.com/v1/create-qr-code/?"));
        assert!(qr.contains("size=300x300"));
        assert!(qr.contains("data=https%3A%2F%2Fis.gd%2Fabc"));
    }
}
