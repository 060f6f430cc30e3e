//! Builder patterns for complex types.

use std::collections::{BTreeMap, BTreeSet};

use crate::context::{extract_wave_number, CommandContext};

/// Builder for creating [`CommandContext`] instances with a fluent API.
#[derive(Debug, Clone)]
pub struct CommandContextBuilder {
    repository: String,
    issue_number: u64,
    current_wave: Option<u32>,
    teams: BTreeSet<String>,
    tasks: BTreeSet<String>,
    memberships: BTreeMap<String, String>,
    state: BTreeMap<String, serde_json::Value>,
    actor: Option<String>,
}

impl CommandContextBuilder {
    /// Creates a new builder with the required fields.
    pub fn new(repository: impl Into<String>, issue_number: u64) -> Self {
        Self {
            repository: repository.into(),
            issue_number,
            current_wave: None,
            teams: BTreeSet::new(),
            tasks: BTreeSet::new(),
            memberships: BTreeMap::new(),
            state: BTreeMap::new(),
            actor: None,
        }
    }

    /// Sets the current wave from an issue title (`"Wave 3 ..."`).
    ///
    /// Titles that do not follow the convention leave the wave unset.
    pub fn title(mut self, title: &str) -> Self {
        if let Some(wave) = extract_wave_number(title) {
            self.current_wave = Some(wave);
        }
        self
    }

    /// Sets the current wave.
    pub fn wave(mut self, wave: u32) -> Self {
        self.current_wave = Some(wave);
        self
    }

    /// Adds a known team.
    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.teams.insert(team.into());
        self
    }

    /// Adds several known teams.
    pub fn teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teams.extend(teams.into_iter().map(Into::into));
        self
    }

    /// Adds a known task.
    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.tasks.insert(task.into());
        self
    }

    /// Adds several known tasks.
    pub fn tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks.extend(tasks.into_iter().map(Into::into));
        self
    }

    /// Records that `actor` belongs to `team`.
    pub fn membership(mut self, actor: impl Into<String>, team: impl Into<String>) -> Self {
        self.memberships.insert(actor.into(), team.into());
        self
    }

    /// Adds an opaque state value.
    pub fn state(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.state.insert(key.into(), value.into());
        self
    }

    /// Sets the comment author.
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Builds the context.
    pub fn build(self) -> CommandContext {
        CommandContext {
            issue_number: self.issue_number,
            repository: self.repository,
            current_wave: self.current_wave,
            available_teams: self.teams,
            available_tasks: self.tasks,
            team_memberships: self.memberships,
            current_state: self.state,
            actor: self.actor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let ctx = CommandContextBuilder::new("org/repo", 42)
            .title("Wave 2 - backend")
            .teams(["team-a", "team-b"])
            .task("W2.T001")
            .membership("alice", "team-a")
            .build();

        assert_eq!(ctx.repository, "org/repo");
        assert_eq!(ctx.issue_number, 42);
        assert_eq!(ctx.current_wave, Some(2));
        assert_eq!(ctx.available_teams.len(), 2);
        assert!(ctx.has_task("W2.T001"));
        assert_eq!(ctx.resolve_actor(), "alice");
    }

    #[test]
    fn test_title_without_wave_keeps_explicit_wave() {
        let ctx = CommandContextBuilder::new("org/repo", 1)
            .wave(5)
            .title("Retro notes")
            .build();
        assert_eq!(ctx.current_wave, Some(5));
    }

    #[test]
    fn test_builder_state_and_actor() {
        let ctx = CommandContextBuilder::new("org/repo", 1)
            .state("team_capacity", serde_json::json!({"team-a": 2}))
            .actor("dana")
            .build();
        assert_eq!(ctx.team_weight("team_capacity", "team-a"), Some(2.0));
        assert_eq!(ctx.resolve_actor(), "dana");
    }
}
