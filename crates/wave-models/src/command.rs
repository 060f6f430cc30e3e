//! Command types for wave coordination.
//!
//! A [`ParsedCommand`] is the structured form of one free-text instruction
//! found in a ticket comment. Its payload is a closed union with one variant
//! per [`CommandKind`], so every consumer matches exhaustively instead of
//! probing an untyped map.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of coordination command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Start a wave, optionally with a set of teams.
    WaveStart,
    /// Assign one or more teams to a list of tasks.
    TeamAssign,
    /// Move a single task to another team.
    TaskAssign,
    /// Mark a team as blocked on another team.
    TeamBlock,
    /// Create a synchronization point between teams.
    TeamSync,
    /// Redistribute work across teams.
    LoadBalance,
    /// Several commands executed in sequence.
    BatchOperation,
}

impl CommandKind {
    /// All kinds, in pattern-table order.
    pub const ALL: [CommandKind; 7] = [
        CommandKind::WaveStart,
        CommandKind::TeamAssign,
        CommandKind::TaskAssign,
        CommandKind::TeamBlock,
        CommandKind::TeamSync,
        CommandKind::LoadBalance,
        CommandKind::BatchOperation,
    ];

    /// Returns the snake_case identifier used in logs and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::WaveStart => "wave_start",
            CommandKind::TeamAssign => "team_assign",
            CommandKind::TaskAssign => "task_assign",
            CommandKind::TeamBlock => "team_block",
            CommandKind::TeamSync => "team_sync",
            CommandKind::LoadBalance => "load_balance",
            CommandKind::BatchOperation => "batch_operation",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of an assignment.
///
/// Ordered Low < Normal < High < Critical.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    /// Maps a priority word to a level.
    ///
    /// Accepts the level names plus the synonyms `medium` and `urgent`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "normal" | "medium" => Some(Priority::Normal),
            "high" => Some(Priority::High),
            "critical" | "urgent" => Some(Priority::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What fires a sync point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    /// Fires when the participating teams complete their work.
    #[default]
    Completion,
    /// Fires on a free-form condition.
    Custom,
}

impl SyncTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncTrigger::Completion => "completion",
            SyncTrigger::Custom => "custom",
        }
    }
}

/// Strategy used to spread work across teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStrategy {
    #[default]
    RoundRobin,
    CapacityBased,
    PriorityWeighted,
}

impl BalanceStrategy {
    /// Maps a strategy phrase (`round robin`, `round-robin`, `capacity`,
    /// `priority weighted`, ...) to a strategy.
    pub fn from_phrase(phrase: &str) -> Option<Self> {
        let key: String = phrase
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        match key.as_str() {
            "roundrobin" => Some(BalanceStrategy::RoundRobin),
            "capacity" | "capacitybased" => Some(BalanceStrategy::CapacityBased),
            "priority" | "priorityweighted" => Some(BalanceStrategy::PriorityWeighted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStrategy::RoundRobin => "round_robin",
            BalanceStrategy::CapacityBased => "capacity_based",
            BalanceStrategy::PriorityWeighted => "priority_weighted",
        }
    }
}

/// Payload of a wave start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveStart {
    /// Wave name or number as typed (e.g. "3", "beta").
    pub wave: String,
    /// Teams to start the wave with; empty means "all teams".
    #[serde(default)]
    pub teams: Vec<String>,
}

/// Payload of a team assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAssignment {
    /// Teams receiving the tasks (deduplicated, never empty).
    pub teams: Vec<String>,
    /// Tasks in the order they were listed.
    pub tasks: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
}

/// Payload of a single-task reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub task_id: String,
    pub team: String,
    #[serde(default)]
    pub priority: Priority,
}

/// Payload of a blocking relation between two teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingRelation {
    pub blocked_team: String,
    pub blocking_team: String,
    /// Condition that releases the block ("completion" when none was given).
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

/// Payload of a sync point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOperation {
    pub teams: Vec<String>,
    pub condition: String,
    pub trigger: SyncTrigger,
}

/// Payload of a load balancing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalanceOperation {
    pub teams: Vec<String>,
    pub strategy: BalanceStrategy,
    #[serde(default)]
    pub constraints: BTreeMap<String, serde_json::Value>,
}

/// Payload of a batch: member commands in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOperation {
    pub commands: Vec<ParsedCommand>,
}

/// Kind-specific command payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandParameters {
    WaveStart(WaveStart),
    TeamAssignment(TeamAssignment),
    TaskAssignment(TaskAssignment),
    BlockingRelation(BlockingRelation),
    SyncOperation(SyncOperation),
    LoadBalanceOperation(LoadBalanceOperation),
    BatchOperation(BatchOperation),
}

impl CommandParameters {
    /// The command kind this payload belongs to.
    pub fn kind(&self) -> CommandKind {
        match self {
            CommandParameters::WaveStart(_) => CommandKind::WaveStart,
            CommandParameters::TeamAssignment(_) => CommandKind::TeamAssign,
            CommandParameters::TaskAssignment(_) => CommandKind::TaskAssign,
            CommandParameters::BlockingRelation(_) => CommandKind::TeamBlock,
            CommandParameters::SyncOperation(_) => CommandKind::TeamSync,
            CommandParameters::LoadBalanceOperation(_) => CommandKind::LoadBalance,
            CommandParameters::BatchOperation(_) => CommandKind::BatchOperation,
        }
    }
}

/// A command extracted from free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    /// The (normalized) text segment this command was parsed from.
    pub raw_text: String,
    /// Who issued the command.
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    pub parameters: CommandParameters,
    /// Match confidence in [0, 1].
    pub confidence: f64,
    /// Lower-ranked candidates for the same text, best first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<ParsedCommand>,
}

impl ParsedCommand {
    /// Creates a command whose kind is derived from its payload.
    pub fn new(
        raw_text: impl Into<String>,
        actor: impl Into<String>,
        parameters: CommandParameters,
        confidence: f64,
    ) -> Self {
        Self {
            kind: parameters.kind(),
            raw_text: raw_text.into(),
            actor: actor.into(),
            timestamp: Utc::now(),
            parameters,
            confidence: confidence.clamp(0.0, 1.0),
            alternatives: Vec::new(),
        }
    }

    /// Wraps several commands into a synthetic batch.
    ///
    /// The batch confidence is the arithmetic mean of member confidences and
    /// its raw text joins member texts with `"; "`.
    pub fn batch(commands: Vec<ParsedCommand>, actor: impl Into<String>) -> Self {
        let confidence = if commands.is_empty() {
            0.0
        } else {
            commands.iter().map(|c| c.confidence).sum::<f64>() / commands.len() as f64
        };
        let raw_text = commands
            .iter()
            .map(|c| c.raw_text.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Self::new(
            raw_text,
            actor,
            CommandParameters::BatchOperation(BatchOperation { commands }),
            confidence,
        )
    }

    /// Sets the alternatives.
    pub fn with_alternatives(mut self, alternatives: Vec<ParsedCommand>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Member commands when this is a batch, otherwise `None`.
    pub fn batch_members(&self) -> Option<&[ParsedCommand]> {
        match &self.parameters {
            CommandParameters::BatchOperation(batch) => Some(&batch.commands),
            _ => None,
        }
    }

    /// Short human-readable description, used in messages and logs.
    pub fn summary(&self) -> String {
        match &self.parameters {
            CommandParameters::WaveStart(p) if p.teams.is_empty() => {
                format!("start wave {}", p.wave)
            }
            CommandParameters::WaveStart(p) => {
                format!("start wave {} with {}", p.wave, p.teams.join(", "))
            }
            CommandParameters::TeamAssignment(p) => format!(
                "assign {} to tasks {} ({} priority)",
                p.teams.join(", "),
                p.tasks.join(", "),
                p.priority
            ),
            CommandParameters::TaskAssignment(p) => {
                format!("move task {} to {} ({} priority)", p.task_id, p.team, p.priority)
            }
            CommandParameters::BlockingRelation(p) => format!(
                "block {} on {} until {}",
                p.blocked_team, p.blocking_team, p.condition
            ),
            CommandParameters::SyncOperation(p) => {
                format!("sync {} on {}", p.teams.join(", "), p.condition)
            }
            CommandParameters::LoadBalanceOperation(p) => format!(
                "balance {} using {}",
                p.teams.join(", "),
                p.strategy.as_str()
            ),
            CommandParameters::BatchOperation(p) => format!("batch of {} commands", p.commands.len()),
        }
    }
}
