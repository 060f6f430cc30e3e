//! Error types for the parser crate.

use thiserror::Error;
use wave_models::CommandKind;

/// Errors that can occur while parsing a comment.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Nothing left to parse after trimming.
    #[error("Empty command input")]
    EmptyInput,

    /// No grammar matched a segment.
    #[error("Could not understand command: \"{segment}\"")]
    NoMatch {
        /// The offending (normalized) segment.
        segment: String,
        /// Up to three command templates hinted at by the segment.
        suggestions: Vec<String>,
        /// Every kind the parser knows, for diagnostics.
        known_kinds: Vec<CommandKind>,
    },

    /// A vocabulary extension could not be compiled.
    #[error("invalid vocabulary entry: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Configuration values out of range.
    #[error("invalid parser configuration: {0}")]
    InvalidConfig(String),
}

impl ParseError {
    /// Template suggestions carried by a `NoMatch`, empty otherwise.
    pub fn suggestions(&self) -> &[String] {
        match self {
            ParseError::NoMatch { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;
