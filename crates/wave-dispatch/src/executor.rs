//! Per-kind command handlers.
//!
//! Handlers are pure: they describe the side effects a command implies as
//! [`CommandAction`]s and leave applying them (issue updates, team
//! notifications) to the caller.

use serde_json::{json, Value};
use tracing::{debug, info, warn};
use wave_models::{
    BatchOperation, BlockingRelation, CommandAction, CommandContext, CommandExecutionResult,
    CommandKind, CommandParameters, LoadBalanceOperation, ParsedCommand, SyncOperation,
    TaskAssignment, TeamAssignment, WaveStart,
};

use crate::balance::plan_distribution;
use crate::error::{ExecutionError, Result};

/// Turns validated commands into action lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Executes one command.
    ///
    /// Batches run their members sequentially, in order; member faults
    /// become failed member results instead of aborting the batch.
    pub fn execute(
        &self,
        command: &ParsedCommand,
        context: &CommandContext,
    ) -> Result<CommandExecutionResult> {
        let found = command.parameters.kind();
        if command.kind != found {
            return Err(ExecutionError::ParameterMismatch {
                kind: command.kind,
                found,
            });
        }

        let (message, actions) = match &command.parameters {
            CommandParameters::WaveStart(p) => start_wave(p, context),
            CommandParameters::TeamAssignment(p) => assign_teams(p),
            CommandParameters::TaskAssignment(p) => reassign_task(p),
            CommandParameters::BlockingRelation(p) => block_team(p),
            CommandParameters::SyncOperation(p) => sync_teams(p),
            CommandParameters::LoadBalanceOperation(p) => balance_load(p, context),
            CommandParameters::BatchOperation(batch) => {
                return self.execute_batch(command, batch, context);
            }
        };

        debug!(kind = %command.kind, actions = actions.len(), "Executed command");
        Ok(CommandExecutionResult::succeeded(command.clone(), message, actions))
    }

    fn execute_batch(
        &self,
        command: &ParsedCommand,
        batch: &BatchOperation,
        context: &CommandContext,
    ) -> Result<CommandExecutionResult> {
        if batch.commands.is_empty() {
            return Err(ExecutionError::EmptyBatch);
        }

        let total = batch.commands.len();
        let mut successful = 0;
        let mut actions = Vec::new();
        let mut failures = Vec::new();

        for member in &batch.commands {
            let outcome = if member.kind == CommandKind::BatchOperation {
                Err(ExecutionError::UnsupportedCommand(format!(
                    "nested {}",
                    CommandKind::BatchOperation
                )))
            } else {
                self.execute(member, context)
            };

            match outcome {
                Ok(result) if result.success => {
                    successful += 1;
                    actions.extend(result.actions().iter().cloned());
                }
                Ok(result) => failures.push(result.message),
                Err(err) => {
                    warn!(kind = %member.kind, error = %err, "Batch member failed");
                    failures.push(format!("{}: {}", member.kind, err));
                }
            }
        }

        info!(successful, total, "Executed batch");
        let message = format!("Batch operation: {}/{} commands succeeded", successful, total);
        if successful > 0 {
            Ok(CommandExecutionResult::succeeded(command.clone(), message, actions))
        } else {
            Ok(CommandExecutionResult::failed(
                command.clone(),
                message,
                failures.join("; "),
            ))
        }
    }
}

fn notify(team: &str, reason: &str) -> CommandAction {
    CommandAction::new("notify_team", team).detail("reason", reason)
}

fn start_wave(p: &WaveStart, context: &CommandContext) -> (String, Vec<CommandAction>) {
    let mut actions = vec![CommandAction::new("start_wave", format!("wave-{}", p.wave))
        .detail("wave", p.wave.as_str())
        .detail("teams", json!(p.teams))
        .detail("issue", context.issue_number)
        .detail("repository", context.repository.as_str())];
    actions.extend(p.teams.iter().map(|team| {
        notify(team, "wave_started").detail("wave", p.wave.as_str())
    }));

    let message = if p.teams.is_empty() {
        format!("Started wave {}", p.wave)
    } else {
        format!("Started wave {} with {}", p.wave, p.teams.join(", "))
    };
    (message, actions)
}

fn assign_teams(p: &TeamAssignment) -> (String, Vec<CommandAction>) {
    let actions = p
        .teams
        .iter()
        .map(|team| {
            CommandAction::new("assign_tasks", team)
                .detail("tasks", json!(p.tasks))
                .detail("priority", p.priority.as_str())
        })
        .collect();
    let message = format!(
        "Assigned {} task(s) to {} with {} priority",
        p.tasks.len(),
        p.teams.join(", "),
        p.priority
    );
    (message, actions)
}

fn reassign_task(p: &TaskAssignment) -> (String, Vec<CommandAction>) {
    let actions = vec![
        CommandAction::new("reassign_task", p.task_id.as_str())
            .detail("team", p.team.as_str())
            .detail("priority", p.priority.as_str()),
        notify(&p.team, "task_reassigned").detail("task", p.task_id.as_str()),
    ];
    let message = format!("Moved task {} to {}", p.task_id, p.team);
    (message, actions)
}

fn block_team(p: &BlockingRelation) -> (String, Vec<CommandAction>) {
    let mut block = CommandAction::new("block_team", p.blocked_team.as_str())
        .detail("blocked_by", p.blocking_team.as_str())
        .detail("condition", p.condition.as_str());
    if let Some(until) = &p.until {
        block = block.detail("until", until.as_str());
    }
    let actions = vec![
        block,
        notify(&p.blocking_team, "blocking_team").detail("blocked_team", p.blocked_team.as_str()),
    ];
    let message = format!(
        "{} is blocked on {} until {}",
        p.blocked_team, p.blocking_team, p.condition
    );
    (message, actions)
}

fn sync_teams(p: &SyncOperation) -> (String, Vec<CommandAction>) {
    let mut actions = vec![CommandAction::new("create_sync_point", p.teams.join("+"))
        .detail("teams", json!(p.teams))
        .detail("condition", p.condition.as_str())
        .detail("trigger", p.trigger.as_str())];
    actions.extend(p.teams.iter().map(|team| {
        notify(team, "sync_point").detail("condition", p.condition.as_str())
    }));
    let message = format!(
        "Created {} sync point for {} on {}",
        p.trigger.as_str(),
        p.teams.join(", "),
        p.condition
    );
    (message, actions)
}

fn balance_load(p: &LoadBalanceOperation, context: &CommandContext) -> (String, Vec<CommandAction>) {
    let plan = plan_distribution(p, context);

    let distribution: serde_json::Map<String, Value> = plan
        .assignments
        .iter()
        .map(|(team, tasks)| (team.clone(), json!(tasks)))
        .collect();
    let mut actions = vec![CommandAction::new("balance_load", p.strategy.as_str())
        .detail("teams", json!(p.teams))
        .detail("constraints", json!(p.constraints))
        .detail("distribution", Value::Object(distribution))
        .detail("unassigned", json!(plan.unassigned))];
    actions.extend(plan.assignments.iter().filter(|(_, tasks)| !tasks.is_empty()).map(
        |(team, tasks)| {
            CommandAction::new("assign_tasks", team.as_str())
                .detail("tasks", json!(tasks))
                .detail("strategy", p.strategy.as_str())
        },
    ));

    let mut message = format!(
        "Balanced {} task(s) across {} team(s) using {}",
        plan.assigned_count(),
        p.teams.len(),
        p.strategy.as_str()
    );
    if !plan.unassigned.is_empty() {
        message.push_str(&format!(", {} left unassigned", plan.unassigned.len()));
    }
    (message, actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_models::{CommandContextBuilder, Priority};

    fn context() -> CommandContext {
        CommandContextBuilder::new("acme/platform", 9)
            .teams(["team-a", "team-b"])
            .tasks(["1", "2", "3"])
            .build()
    }

    fn command(parameters: CommandParameters) -> ParsedCommand {
        ParsedCommand::new("test", "octocat", parameters, 0.85)
    }

    fn assignment(team: &str) -> ParsedCommand {
        command(CommandParameters::TeamAssignment(TeamAssignment {
            teams: vec![team.to_string()],
            tasks: vec!["1".to_string()],
            priority: Priority::High,
        }))
    }

    #[test]
    fn test_team_assignment_actions() {
        let result = CommandExecutor::new().execute(&assignment("team-a"), &context()).unwrap();

        assert!(result.success);
        assert_eq!(result.message, "Assigned 1 task(s) to team-a with high priority");
        let actions = result.actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action_type, "assign_tasks");
        assert_eq!(actions[0].target, "team-a");
        assert_eq!(actions[0].details["priority"], json!("high"));
    }

    #[test]
    fn test_block_records_until() {
        let block = command(CommandParameters::BlockingRelation(BlockingRelation {
            blocked_team: "team-a".to_string(),
            blocking_team: "team-b".to_string(),
            condition: "api ready".to_string(),
            until: Some("api ready".to_string()),
        }));
        let result = CommandExecutor::new().execute(&block, &context()).unwrap();

        assert_eq!(result.message, "team-a is blocked on team-b until api ready");
        assert_eq!(result.actions()[0].details["until"], json!("api ready"));
        assert_eq!(result.actions()[1].target, "team-b");
    }

    #[test]
    fn test_load_balance_plan_in_actions() {
        let balance = command(CommandParameters::LoadBalanceOperation(LoadBalanceOperation {
            teams: vec!["team-a".to_string(), "team-b".to_string()],
            strategy: Default::default(),
            constraints: Default::default(),
        }));
        let result = CommandExecutor::new().execute(&balance, &context()).unwrap();

        assert_eq!(result.message, "Balanced 3 task(s) across 2 team(s) using round_robin");
        let actions = result.actions();
        assert_eq!(actions.len(), 3);
        assert_eq!(
            actions[0].details["distribution"],
            json!({"team-a": ["1", "3"], "team-b": ["2"]})
        );
    }

    #[test]
    fn test_batch_runs_members_in_order() {
        let batch = ParsedCommand::batch(vec![assignment("team-a"), assignment("team-b")], "octocat");
        let result = CommandExecutor::new().execute(&batch, &context()).unwrap();

        assert!(result.success);
        assert_eq!(result.message, "Batch operation: 2/2 commands succeeded");
        let targets: Vec<&str> = result.actions().iter().map(|a| a.target.as_str()).collect();
        assert_eq!(targets, vec!["team-a", "team-b"]);
    }

    #[test]
    fn test_nested_batch_is_unsupported() {
        let inner = ParsedCommand::batch(vec![assignment("team-a")], "octocat");
        let outer = ParsedCommand::batch(vec![assignment("team-b"), inner], "octocat");
        let result = CommandExecutor::new().execute(&outer, &context()).unwrap();

        assert!(result.success);
        assert_eq!(result.message, "Batch operation: 1/2 commands succeeded");
        assert_eq!(result.actions().len(), 1);
    }

    #[test]
    fn test_batch_with_no_successes_fails() {
        let inner = ParsedCommand::batch(vec![assignment("team-a")], "octocat");
        let outer = ParsedCommand::batch(vec![inner], "octocat");
        let result = CommandExecutor::new().execute(&outer, &context()).unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().contains("unsupported command type"));
    }

    #[test]
    fn test_empty_batch_is_fault() {
        let empty = ParsedCommand::batch(Vec::new(), "octocat");
        assert!(matches!(
            CommandExecutor::new().execute(&empty, &context()),
            Err(ExecutionError::EmptyBatch)
        ));
    }

    #[test]
    fn test_mismatched_kind_is_fault() {
        let mut command = assignment("team-a");
        command.kind = CommandKind::TeamSync;
        assert!(matches!(
            CommandExecutor::new().execute(&command, &context()),
            Err(ExecutionError::ParameterMismatch { .. })
        ));
    }
}
