use url::Url;

/// Resolves an extracted URL value to an absolute URL against the page it
/// came from.
///
/// Resolution is origin-based: protocol-relative values inherit the page's
/// scheme, absolute paths are prefixed with the page's origin, and anything
/// else (including `./x` and bare `x`) is treated as a path under the
/// origin. Already-absolute http(s) values pass through untouched.
pub fn absolutize(value: &str, base: &Url) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    if value.starts_with("http://") || value.starts_with("https://") {
        return value.to_string();
    }

    if let Some(rest) = value.strip_prefix("//") {
        return format!("{}://{}", base.scheme(), rest);
    }

    let origin = base.origin().ascii_serialization();
    if value.starts_with('/') {
        return format!("{}{}", origin, value);
    }

    let relative = value.strip_prefix("./").unwrap_or(value);
    format!("{}/{}", origin, relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/a/b").unwrap()
    }

    #[test]
    fn absolute_values_pass_through() {
        assert_eq!(
            absolutize("https://cdn.example.net/img.png", &base()),
            "https://cdn.example.net/img.png"
        );
        assert_eq!(
            absolutize("http://example.com/x", &base()),
            "http://example.com/x"
        );
    }

    #[test]
    fn protocol_relative_inherits_scheme() {
        assert_eq!(absolutize("//cdn/f.ico", &base()), "https://cdn/f.ico");
    }

    #[test]
    fn absolute_path_gets_origin() {
        assert_eq!(absolutize("/f.ico", &base()), "https://example.com/f.ico");
    }

    #[test]
    fn relative_paths_resolve_to_origin() {
        assert_eq!(absolutize("./f.ico", &base()), "https://example.com/f.ico");
        assert_eq!(absolutize("f.ico", &base()), "https://example.com/f.ico");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(absolutize("", &base()), "");
        assert_eq!(absolutize("   ", &base()), "");
    }
}
