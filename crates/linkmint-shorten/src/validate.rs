use url::Url;

/// Validates a provider's raw response body and returns the trimmed short
/// URL when it passes.
///
/// The rule, shared across all providers: non-empty, starts with `http`,
/// no literal `Error` marker anywhere in the body, and parses as an
/// absolute http(s) URL. Anything else counts as provider failure.
pub fn short_url(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() || !trimmed.starts_with("http") || trimmed.contains("Error") {
        return None;
    }

    let parsed = Url::parse(trimmed).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(trimmed.to_string()),
        _ => None,
    }
}
