//! Result types produced by parsing, validation and dispatch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::command::ParsedCommand;

/// Outcome of validating one command against a context.
///
/// `valid` is true iff `errors` is empty; warnings and suggestions never
/// affect validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    /// Creates an empty, valid result.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Records an error; the result becomes invalid.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.valid = false;
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn suggestion(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }

    /// Appends another result (used for batch members).
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.suggestions.extend(other.suggestions);
        self.valid = self.errors.is_empty();
    }
}

/// Timing and quality figures for a parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseMetadata {
    pub parse_time_ms: f64,
    /// Mean confidence of the parsed commands (0 when none).
    pub confidence: f64,
    /// Average number of retained alternatives per parsed command.
    pub ambiguity_score: f64,
}

/// Outcome of parsing one comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub commands: Vec<ParsedCommand>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub metadata: ParseMetadata,
}

impl ParseResult {
    /// A parse that produced nothing but errors.
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// A side effect the caller is expected to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandAction {
    /// Action type, e.g. `assign_tasks` or `notify_team`.
    #[serde(rename = "type")]
    pub action_type: String,
    /// What the action applies to (team, task, wave).
    pub target: String,
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl CommandAction {
    pub fn new(action_type: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            target: target.into(),
            details: BTreeMap::new(),
        }
    }

    /// Adds a detail entry.
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Outcome of executing one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandExecutionResult {
    pub command: ParsedCommand,
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<CommandAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandExecutionResult {
    /// A successful execution with its intended actions.
    pub fn succeeded(
        command: ParsedCommand,
        message: impl Into<String>,
        actions: Vec<CommandAction>,
    ) -> Self {
        Self {
            command,
            success: true,
            message: message.into(),
            actions: Some(actions),
            error: None,
        }
    }

    /// A failed execution.
    pub fn failed(command: ParsedCommand, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            command,
            success: false,
            message: message.into(),
            actions: None,
            error: Some(error.into()),
        }
    }

    /// Actions, or an empty slice for failures.
    pub fn actions(&self) -> &[CommandAction] {
        self.actions.as_deref().unwrap_or(&[])
    }
}

/// Counters for a dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchMetadata {
    pub total_commands: usize,
    pub successful_commands: usize,
    pub processing_time_ms: f64,
}

/// Aggregated outcome of dispatching one comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandDispatchResult {
    pub success: bool,
    pub results: Vec<CommandExecutionResult>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub metadata: DispatchMetadata,
}

impl CommandDispatchResult {
    /// A dispatch that failed before any command ran.
    pub fn failed(errors: Vec<String>, warnings: Vec<String>, processing_time_ms: f64) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            errors,
            warnings,
            metadata: DispatchMetadata {
                total_commands: 0,
                successful_commands: 0,
                processing_time_ms,
            },
        }
    }
}
