//! Parameter builders: captured slot text -> typed command payloads.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use wave_models::{
    BalanceStrategy, BlockingRelation, CommandKind, CommandParameters, LoadBalanceOperation,
    Priority, SyncOperation, SyncTrigger, TaskAssignment, TeamAssignment, WaveStart,
};

use crate::expand::{dedup_preserving_order, expand_task_list, expand_team_list};
use crate::patterns::{Captured, Slot};

/// Condition default for blocks without an explicit condition.
pub const DEFAULT_BLOCK_CONDITION: &str = "completion";

/// Constraint key for the per-team task cap.
pub const MAX_TASKS_PER_TEAM: &str = "max_tasks_per_team";

static COMPLETION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:complet\w*|finish\w*|done)\b").expect("Invalid completion regex")
});

/// A payload plus notes worth surfacing if this candidate is chosen.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Built {
    pub parameters: CommandParameters,
    pub notes: Vec<String>,
}

impl Built {
    fn new(parameters: CommandParameters) -> Self {
        Self {
            parameters,
            notes: Vec::new(),
        }
    }
}

/// Builds the payload for `kind` from captured slots.
///
/// Returns `None` when the captures cannot form a usable payload (for
/// example a team list that expands to nothing).
pub(crate) fn build_parameters(kind: CommandKind, caps: &Captured<'_>) -> Option<Built> {
    match kind {
        CommandKind::WaveStart => wave_start(caps),
        CommandKind::TeamAssign => team_assignment(caps),
        CommandKind::TaskAssign => task_assignment(caps),
        CommandKind::TeamBlock => blocking_relation(caps),
        CommandKind::TeamSync => sync_operation(caps),
        CommandKind::LoadBalance => load_balance(caps),
        // Batches are assembled from parsed segments, never matched directly.
        CommandKind::BatchOperation => None,
    }
}

fn teams(caps: &Captured<'_>, slot: Slot) -> Vec<String> {
    dedup_preserving_order(expand_team_list(caps.get(slot).unwrap_or_default()))
}

fn priority(caps: &Captured<'_>) -> Priority {
    caps.get(Slot::Priority)
        .and_then(Priority::from_token)
        .unwrap_or_default()
}

fn unquote(text: &str) -> String {
    text.trim().trim_matches('"').trim().to_string()
}

/// First team of a list; extra teams are reported in `notes`.
fn single_team(list: Vec<String>, role: &str, notes: &mut Vec<String>) -> Option<String> {
    let mut iter = list.into_iter();
    let first = iter.next()?;
    let rest: Vec<String> = iter.collect();
    if !rest.is_empty() {
        notes.push(format!(
            "Only one {} team is supported; using {} and ignoring {}",
            role,
            first,
            rest.join(", ")
        ));
    }
    Some(first)
}

fn wave_start(caps: &Captured<'_>) -> Option<Built> {
    let wave = caps.get(Slot::Wave)?.trim_start_matches('#').to_string();
    Some(Built::new(CommandParameters::WaveStart(WaveStart {
        wave,
        teams: teams(caps, Slot::Teams),
    })))
}

fn team_assignment(caps: &Captured<'_>) -> Option<Built> {
    let teams = teams(caps, Slot::Teams);
    let tasks = dedup_preserving_order(expand_task_list(caps.get(Slot::Tasks)?));
    if teams.is_empty() || tasks.is_empty() {
        return None;
    }
    Some(Built::new(CommandParameters::TeamAssignment(TeamAssignment {
        teams,
        tasks,
        priority: priority(caps),
    })))
}

fn task_assignment(caps: &Captured<'_>) -> Option<Built> {
    let task_id = caps.get(Slot::Task)?.trim_start_matches('#').to_string();
    let mut notes = Vec::new();
    let team = single_team(teams(caps, Slot::Teams), "target", &mut notes)?;
    Some(Built {
        parameters: CommandParameters::TaskAssignment(TaskAssignment {
            task_id,
            team,
            priority: priority(caps),
        }),
        notes,
    })
}

fn blocking_relation(caps: &Captured<'_>) -> Option<Built> {
    let mut notes = Vec::new();
    let blocked_team = single_team(teams(caps, Slot::BlockedTeams), "blocked", &mut notes)?;
    let blocking_team = single_team(teams(caps, Slot::BlockingTeams), "blocking", &mut notes)?;

    let condition = caps.get(Slot::Condition).map(unquote).filter(|c| !c.is_empty());
    let until = match caps.get(Slot::Connector) {
        Some("until") => condition.clone(),
        _ => None,
    };

    Some(Built {
        parameters: CommandParameters::BlockingRelation(BlockingRelation {
            blocked_team,
            blocking_team,
            condition: condition.unwrap_or_else(|| DEFAULT_BLOCK_CONDITION.to_string()),
            until,
        }),
        notes,
    })
}

fn sync_operation(caps: &Captured<'_>) -> Option<Built> {
    let teams = teams(caps, Slot::Teams);
    if teams.is_empty() {
        return None;
    }
    // A bare "sync teams a, b" keeps an empty condition; validation rejects it.
    let condition = caps.get(Slot::Condition).map(unquote).unwrap_or_default();
    let trigger = if COMPLETION_REGEX.is_match(&condition) {
        SyncTrigger::Completion
    } else {
        SyncTrigger::Custom
    };
    Some(Built::new(CommandParameters::SyncOperation(SyncOperation {
        teams,
        condition,
        trigger,
    })))
}

fn load_balance(caps: &Captured<'_>) -> Option<Built> {
    let teams = teams(caps, Slot::Teams);
    if teams.is_empty() {
        return None;
    }
    let strategy = caps
        .get(Slot::Strategy)
        .and_then(BalanceStrategy::from_phrase)
        .unwrap_or_default();

    let mut constraints = BTreeMap::new();
    if let Some(max) = caps.get(Slot::MaxPerTeam).and_then(|m| m.parse::<u64>().ok()) {
        constraints.insert(MAX_TASKS_PER_TEAM.to_string(), serde_json::Value::from(max));
    }

    Some(Built::new(CommandParameters::LoadBalanceOperation(LoadBalanceOperation {
        teams,
        strategy,
        constraints,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternTable;

    fn build(pattern_name: &str, text: &str) -> Option<Built> {
        let pattern = PatternTable::builtin()
            .iter()
            .find(|p| p.name == pattern_name)
            .unwrap();
        let caps = pattern.captures(text).unwrap();
        build_parameters(pattern.kind, &caps)
    }

    #[test]
    fn test_team_assignment_dedups_and_defaults_priority() {
        let built = build("team_assign", "assign teams a, a, b to tasks 1-2, 2").unwrap();
        match built.parameters {
            CommandParameters::TeamAssignment(p) => {
                assert_eq!(p.teams, vec!["team-a", "team-b"]);
                assert_eq!(p.tasks, vec!["1", "2"]);
                assert_eq!(p.priority, Priority::Normal);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_task_assignment_extra_teams_noted() {
        let built = build("task_reassign", "move task 7 to teams b, c with urgent priority").unwrap();
        assert_eq!(built.notes.len(), 1);
        assert!(built.notes[0].contains("team-c"));
        match built.parameters {
            CommandParameters::TaskAssignment(p) => {
                assert_eq!(p.task_id, "7");
                assert_eq!(p.team, "team-b");
                assert_eq!(p.priority, Priority::Critical);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_block_until_condition() {
        let built = build("team_block", "block team a on team b until \"api ready\"").unwrap();
        match built.parameters {
            CommandParameters::BlockingRelation(p) => {
                assert_eq!(p.blocked_team, "team-a");
                assert_eq!(p.blocking_team, "team-b");
                assert_eq!(p.condition, "api ready");
                assert_eq!(p.until.as_deref(), Some("api ready"));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_block_default_condition() {
        let built = build("team_block_relation", "team 3 depends on team 1").unwrap();
        match built.parameters {
            CommandParameters::BlockingRelation(p) => {
                assert_eq!(p.blocked_team, "team-3");
                assert_eq!(p.blocking_team, "team-1");
                assert_eq!(p.condition, DEFAULT_BLOCK_CONDITION);
                assert!(p.until.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_sync_trigger_inference() {
        let built = build("team_sync", "sync teams a, b after completion of api").unwrap();
        match built.parameters {
            CommandParameters::SyncOperation(p) => {
                assert_eq!(p.condition, "completion of api");
                assert_eq!(p.trigger, SyncTrigger::Completion);
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        let built = build("team_sync", "sync teams a, b on deploy").unwrap();
        match built.parameters {
            CommandParameters::SyncOperation(p) => assert_eq!(p.trigger, SyncTrigger::Custom),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_bare_sync_has_empty_condition() {
        let built = build("team_sync_bare", "sync teams a and b").unwrap();
        match built.parameters {
            CommandParameters::SyncOperation(p) => {
                assert_eq!(p.teams, vec!["team-a", "team-b"]);
                assert!(p.condition.is_empty());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_load_balance_strategy_and_cap() {
        let built = build(
            "load_balance",
            "distribute tasks across teams 1-3 using capacity based max 4 per team",
        )
        .unwrap();
        match built.parameters {
            CommandParameters::LoadBalanceOperation(p) => {
                assert_eq!(p.teams, vec!["team-1", "team-2", "team-3"]);
                assert_eq!(p.strategy, BalanceStrategy::CapacityBased);
                assert_eq!(p.constraints.get(MAX_TASKS_PER_TEAM), Some(&serde_json::json!(4)));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_wave_start_without_teams() {
        let built = build("wave_start", "start wave #4").unwrap();
        assert_eq!(
            built.parameters,
            CommandParameters::WaveStart(WaveStart {
                wave: "4".to_string(),
                teams: Vec::new(),
            })
        );
    }
}
