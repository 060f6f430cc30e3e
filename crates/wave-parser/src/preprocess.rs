//! Input normalization applied before segmentation.
//!
//! Case and most punctuation carry no command meaning, so the whole comment
//! is folded into a canonical form that the grammar table can match:
//!
//! ```text
//! "  Assign Team-Alpha to  “task#12”  "  ->  "assign team alpha to \"task #12\""
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::Result;

/// Curly double, angled and back quotes.
static QUOTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[“”„‟«»`]"#).expect("Invalid quote regex"));

/// Single quotes opening a quoted phrase. Apostrophes inside words stay.
static SINGLE_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[\s(])['‘’‚‛]").expect("Invalid single quote regex"));

/// Single quotes closing a quoted phrase.
static SINGLE_CLOSE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"['‘’‚‛]([\s,.;:!?)]|$)").expect("Invalid single quote regex")
});

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static TASK_HASH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btask#").expect("Invalid task marker regex"));

static TEAM_DASH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bteam-").expect("Invalid team marker regex"));

/// Folds raw comment text into the form the pattern table expects.
#[derive(Debug)]
pub struct Normalizer {
    vocabulary: BTreeMap<String, String>,
    vocabulary_regex: Option<Regex>,
}

impl Normalizer {
    /// Creates a normalizer with extra whole-word substitutions.
    pub fn new(vocabulary: &BTreeMap<String, String>) -> Result<Self> {
        let vocabulary: BTreeMap<String, String> = vocabulary
            .iter()
            .map(|(word, canonical)| (word.to_lowercase(), canonical.to_lowercase()))
            .collect();

        let vocabulary_regex = if vocabulary.is_empty() {
            None
        } else {
            // Longest words first so multi-word entries win over their prefixes.
            let mut words: Vec<&String> = vocabulary.keys().collect();
            words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"\b(?:{})\b", alternation))?)
        };

        Ok(Self {
            vocabulary,
            vocabulary_regex,
        })
    }

    /// Normalizes a whole comment.
    pub fn normalize(&self, input: &str) -> String {
        let text = QUOTE_REGEX.replace_all(input.trim(), "\"");
        let text = SINGLE_OPEN_REGEX.replace_all(&text, "${1}\"");
        let text = SINGLE_CLOSE_REGEX.replace_all(&text, "\"${1}");
        let text = WHITESPACE_REGEX.replace_all(&text, " ");
        let text = TASK_HASH_REGEX.replace_all(&text, "task #");
        let text = TEAM_DASH_REGEX.replace_all(&text, "team ");
        let text = text.to_lowercase();

        match &self.vocabulary_regex {
            Some(regex) => regex
                .replace_all(&text, |caps: &Captures| {
                    self.vocabulary
                        .get(&caps[0])
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            None => text,
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            vocabulary: BTreeMap::new(),
            vocabulary_regex: None,
        }
    }
}
