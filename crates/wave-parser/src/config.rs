//! Parser configuration.
//!
//! # Environment Variables
//!
//! - `WAVE_CONFIDENCE_THRESHOLD`: minimum confidence for alternatives and
//!   for the "please rephrase" warning (0.0 - 1.0)
//! - `WAVE_MAX_ALTERNATIVES`: maximum alternatives kept per command
//! - `WAVE_FUZZY_MATCHING`: `true`/`false`, enables typo suggestions
//! - `WAVE_VOCABULARY`: extra synonyms as `word=canonical,word=canonical`

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{ParseError, Result};

/// Environment variable for the confidence threshold.
pub const CONFIDENCE_THRESHOLD_ENV: &str = "WAVE_CONFIDENCE_THRESHOLD";

/// Environment variable for the alternative cap.
pub const MAX_ALTERNATIVES_ENV: &str = "WAVE_MAX_ALTERNATIVES";

/// Environment variable toggling fuzzy suggestions.
pub const FUZZY_MATCHING_ENV: &str = "WAVE_FUZZY_MATCHING";

/// Environment variable for vocabulary extensions.
pub const VOCABULARY_ENV: &str = "WAVE_VOCABULARY";

/// Tunables for a [`CommandParser`](crate::CommandParser).
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Candidates must exceed this to be kept as alternatives; commands
    /// below it get a rephrasing warning during validation.
    pub confidence_threshold: f64,
    /// Maximum alternatives kept per command.
    pub max_alternatives: usize,
    /// Whether to compute typo suggestions.
    pub enable_fuzzy_matching: bool,
    /// Word -> canonical word substitutions applied before matching.
    pub custom_vocabulary: BTreeMap<String, String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            max_alternatives: 3,
            enable_fuzzy_matching: true,
            custom_vocabulary: BTreeMap::new(),
        }
    }
}

impl ParserConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by any `WAVE_*` environment variables that parse.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(CONFIDENCE_THRESHOLD_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(value) => config.confidence_threshold = value,
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", CONFIDENCE_THRESHOLD_ENV),
            }
        }
        if let Ok(raw) = std::env::var(MAX_ALTERNATIVES_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(value) => config.max_alternatives = value,
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", MAX_ALTERNATIVES_ENV),
            }
        }
        if let Ok(raw) = std::env::var(FUZZY_MATCHING_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.enable_fuzzy_matching = true,
                "0" | "false" | "no" | "off" => config.enable_fuzzy_matching = false,
                _ => warn!(value = %raw, "Ignoring invalid {}", FUZZY_MATCHING_ENV),
            }
        }
        if let Ok(raw) = std::env::var(VOCABULARY_ENV) {
            config.custom_vocabulary.extend(parse_vocabulary(&raw));
        }

        config
    }

    /// Sets the confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Sets the maximum number of alternatives.
    pub fn with_max_alternatives(mut self, max: usize) -> Self {
        self.max_alternatives = max;
        self
    }

    /// Enables or disables fuzzy suggestions.
    pub fn with_fuzzy_matching(mut self, enabled: bool) -> Self {
        self.enable_fuzzy_matching = enabled;
        self
    }

    /// Adds a vocabulary substitution (`word` is read as `canonical`).
    pub fn with_synonym(mut self, word: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.custom_vocabulary
            .insert(word.into().to_lowercase(), canonical.into().to_lowercase());
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ParseError::InvalidConfig(format!(
                "confidence threshold {} is outside [0, 1]",
                self.confidence_threshold
            )));
        }
        if let Some((word, _)) = self
            .custom_vocabulary
            .iter()
            .find(|(word, canonical)| word.trim().is_empty() || canonical.trim().is_empty())
        {
            return Err(ParseError::InvalidConfig(format!(
                "vocabulary entry '{}' has an empty side",
                word
            )));
        }
        Ok(())
    }
}

/// Parses `word=canonical` pairs separated by commas; malformed pairs are skipped.
fn parse_vocabulary(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (word, canonical) = pair.split_once('=')?;
            let word = word.trim().to_lowercase();
            let canonical = canonical.trim().to_lowercase();
            if word.is_empty() || canonical.is_empty() {
                None
            } else {
                Some((word, canonical))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();

        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.max_alternatives, 3);
        assert!(config.enable_fuzzy_matching);
        assert!(config.custom_vocabulary.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ParserConfig::new()
            .with_confidence_threshold(0.5)
            .with_max_alternatives(1)
            .with_fuzzy_matching(false)
            .with_synonym("Kickoff", "start");

        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.max_alternatives, 1);
        assert!(!config.enable_fuzzy_matching);
        assert_eq!(config.custom_vocabulary.get("kickoff"), Some(&"start".to_string()));
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let config = ParserConfig::new().with_confidence_threshold(1.5);
        assert!(matches!(config.validate(), Err(ParseError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_empty_synonym() {
        let config = ParserConfig::new().with_synonym("allot", " ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_vocabulary() {
        let vocab = parse_vocabulary("kickoff=start, allot = ASSIGN,broken,=x");
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.get("allot"), Some(&"assign".to_string()));
        assert_eq!(vocab.get("kickoff"), Some(&"start".to_string()));
    }
}
