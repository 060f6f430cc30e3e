//! Splitting of multi-command comments.

use std::sync::LazyLock;

use regex::Regex;

/// Separators between independent commands: `;`, "and then", "then", "also".
static SEPARATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i);|\band\s+then\b|\bthen\b|\balso\b").expect("Invalid separator regex")
});

/// Splits text into trimmed, non-empty command segments, preserving order.
///
/// # Example
/// ```
/// use wave_parser::segment::split_segments;
///
/// let segments = split_segments("start wave 2; assign team a to task 1 and then sync teams a, b on done");
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[1], "assign team a to task 1");
/// ```
pub fn split_segments(input: &str) -> Vec<String> {
    SEPARATOR_REGEX
        .split(input)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment() {
        assert_eq!(split_segments("start wave 1"), vec!["start wave 1"]);
    }

    #[test]
    fn test_all_separators() {
        let segments = split_segments("a; b then c and then d also e");
        assert_eq!(segments, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_separators_are_case_insensitive() {
        assert_eq!(split_segments("a THEN b Also c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_segments_dropped() {
        assert_eq!(split_segments(";; a ;; ; b;"), vec!["a", "b"]);
        assert!(split_segments("   ").is_empty());
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_words_containing_separators_are_kept() {
        // "authentication" and "themes" contain "then"/"the" but not as words
        assert_eq!(
            split_segments("sync teams a, b on authentication themes"),
            vec!["sync teams a, b on authentication themes"]
        );
    }
}
