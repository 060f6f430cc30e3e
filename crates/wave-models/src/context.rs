//! Coordination context supplied with every command.
//!
//! The context is a read-only snapshot built by whoever receives the comment
//! (typically a webhook handler that has already fetched the team roster and
//! task list). Nothing in the parsing or dispatch pipeline mutates it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Actor name used when the context does not identify the requester.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Regex for the `Wave <n>` title convention.
static WAVE_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwave\s+(\d+)").expect("Invalid wave title regex"));

/// Errors for contexts that cannot be dispatched against.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("context has no repository")]
    MissingRepository,

    #[error("context has no issue number")]
    MissingIssue,
}

/// Snapshot of the coordination state a command is interpreted against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandContext {
    /// Ticket the comment was posted on.
    pub issue_number: u64,

    /// Repository identifier (e.g. "org/repo").
    pub repository: String,

    /// Wave currently in progress, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_wave: Option<u32>,

    /// Team ids known to the coordinator.
    #[serde(default)]
    pub available_teams: BTreeSet<String>,

    /// Task ids loaded for the current wave window.
    #[serde(default)]
    pub available_tasks: BTreeSet<String>,

    /// Actor -> team.
    #[serde(default)]
    pub team_memberships: BTreeMap<String, String>,

    /// Opaque coordinator state (capacities, weights, ...).
    #[serde(default)]
    pub current_state: BTreeMap<String, serde_json::Value>,

    /// Author of the comment, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

impl CommandContext {
    /// Creates an empty context for an issue.
    pub fn new(repository: impl Into<String>, issue_number: u64) -> Self {
        Self {
            issue_number,
            repository: repository.into(),
            ..Self::default()
        }
    }

    /// Checks that the context identifies where results should go.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.repository.trim().is_empty() {
            return Err(ContextError::MissingRepository);
        }
        if self.issue_number == 0 {
            return Err(ContextError::MissingIssue);
        }
        Ok(())
    }

    /// Returns true if `team` is a known team (case-insensitive).
    pub fn has_team(&self, team: &str) -> bool {
        contains_ignore_case(&self.available_teams, team)
    }

    /// Returns true if `task` is a loaded task (case-insensitive).
    pub fn has_task(&self, task: &str) -> bool {
        contains_ignore_case(&self.available_tasks, task)
    }

    /// Resolves who issued a command.
    ///
    /// Uses the explicit actor, then the first member in `team_memberships`,
    /// then [`UNKNOWN_ACTOR`].
    pub fn resolve_actor(&self) -> String {
        self.actor
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .or_else(|| self.team_memberships.keys().next().map(String::as_str))
            .unwrap_or(UNKNOWN_ACTOR)
            .to_string()
    }

    /// Reads a numeric per-team weight from `current_state[key][team]`.
    pub fn team_weight(&self, key: &str, team: &str) -> Option<f64> {
        self.current_state
            .get(key)
            .and_then(|table| table.get(team))
            .and_then(|v| v.as_f64())
    }
}

fn contains_ignore_case(set: &BTreeSet<String>, value: &str) -> bool {
    set.contains(value) || set.iter().any(|item| item.eq_ignore_ascii_case(value))
}

/// Extracts the wave number from an issue title such as `"Wave 3: API"`.
///
/// # Example
/// ```
/// use wave_models::context::extract_wave_number;
///
/// assert_eq!(extract_wave_number("WAVE 12 kickoff"), Some(12));
/// assert_eq!(extract_wave_number("Backlog grooming"), None);
/// ```
pub fn extract_wave_number(title: &str) -> Option<u32> {
    WAVE_TITLE_REGEX
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
