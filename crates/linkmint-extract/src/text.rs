/// Maximum length of any cleaned text field.
pub const MAX_TEXT_LEN: usize = 500;

/// Maximum length of an extracted description.
pub const MAX_DESCRIPTION_LEN: usize = 300;

/// Normalizes scraped text: whitespace runs (including CR/LF/TAB) collapse
/// to single spaces, leading/trailing whitespace is dropped, and the result
/// is capped at `max_len` characters.
pub fn clean(text: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(text.len().min(max_len));
    let mut count = 0;
    for word in text.split_whitespace() {
        if count > 0 {
            out.push(' ');
        }
        out.push_str(word);
        count += 1;
    }
    if out.chars().count() > max_len {
        out = out.chars().take(max_len).collect();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean("  a \t b\r\nc  ", MAX_TEXT_LEN), "a b c");
    }

    #[test]
    fn truncates_long_text() {
        let long = "x".repeat(600);
        assert_eq!(clean(&long, MAX_TEXT_LEN).len(), MAX_TEXT_LEN);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let long = "é".repeat(10);
        assert_eq!(clean(&long, 4), "éééé");
    }

    #[test]
    fn empty_input() {
        assert_eq!(clean("", MAX_TEXT_LEN), "");
        assert_eq!(clean("   \n\t ", MAX_TEXT_LEN), "");
    }
}
