//! Utility functions and helpers

/// Keep the first `max_chars` characters of `s`, appending `...` when
/// anything was cut. Counts chars, not bytes, so multi-byte text is never
/// split mid-codepoint.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate_with_ellipsis("hello world", 5), "hello...");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_with_ellipsis("ÉÉÉÉ", 2), "ÉÉ...");
    }
}
