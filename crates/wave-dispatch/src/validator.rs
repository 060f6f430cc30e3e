//! Context-aware validation of parsed commands.
//!
//! Unknown teams are errors; unknown tasks are only warnings since tasks may
//! be defined outside the loaded wave window. Low confidence never blocks
//! execution.

use tracing::debug;
use wave_models::{CommandContext, CommandParameters, ParsedCommand, ValidationResult};
use wave_parser::{suggest, ParserConfig};

/// Checks commands against a [`CommandContext`].
#[derive(Debug, Clone)]
pub struct Validator {
    confidence_threshold: f64,
    fuzzy: bool,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl Validator {
    /// Creates a validator sharing the parser's threshold and fuzzy toggle.
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            fuzzy: config.enable_fuzzy_matching,
        }
    }

    /// Validates one command. `valid` is true iff no errors were recorded.
    pub fn validate(&self, command: &ParsedCommand, context: &CommandContext) -> ValidationResult {
        let mut result = ValidationResult::new();

        match &command.parameters {
            CommandParameters::WaveStart(p) => {
                self.check_teams(&p.teams, context, &mut result);
                let already_active = p
                    .wave
                    .parse::<u32>()
                    .ok()
                    .is_some_and(|wave| context.current_wave == Some(wave));
                if already_active {
                    result.warning(format!("Wave {} is already active", p.wave));
                }
            }
            CommandParameters::TeamAssignment(p) => {
                self.check_teams(&p.teams, context, &mut result);
                check_tasks(&p.tasks, context, &mut result);
            }
            CommandParameters::TaskAssignment(p) => {
                self.check_team(&p.team, context, &mut result);
                check_tasks(std::slice::from_ref(&p.task_id), context, &mut result);
            }
            CommandParameters::BlockingRelation(p) => {
                if p.blocked_team.eq_ignore_ascii_case(&p.blocking_team) {
                    result.error(format!("Team {} cannot block itself", p.blocked_team));
                }
                self.check_team(&p.blocked_team, context, &mut result);
                if !p.blocking_team.eq_ignore_ascii_case(&p.blocked_team) {
                    self.check_team(&p.blocking_team, context, &mut result);
                }
            }
            CommandParameters::SyncOperation(p) => {
                self.check_teams(&p.teams, context, &mut result);
                if p.condition.trim().is_empty() {
                    result.error("Sync condition must not be empty");
                }
            }
            CommandParameters::LoadBalanceOperation(p) => {
                self.check_teams(&p.teams, context, &mut result);
                if p.teams.len() < 2 {
                    result.warning(format!(
                        "Load balancing across {} team has no effect; list at least two teams",
                        p.teams.len()
                    ));
                }
            }
            CommandParameters::BatchOperation(batch) => {
                if batch.commands.is_empty() {
                    result.error("Batch operation contains no commands");
                }
                for member in &batch.commands {
                    result.merge(self.validate(member, context));
                }
            }
        }

        if command.confidence < self.confidence_threshold {
            result.warning(format!(
                "Low confidence ({:.2}) for \"{}\"; consider rephrasing the command",
                command.confidence, command.raw_text
            ));
        }

        debug!(
            kind = %command.kind,
            valid = result.valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Validated command"
        );
        result
    }

    fn check_teams(&self, teams: &[String], context: &CommandContext, result: &mut ValidationResult) {
        for team in teams {
            self.check_team(team, context, result);
        }
    }

    fn check_team(&self, team: &str, context: &CommandContext, result: &mut ValidationResult) {
        if context.has_team(team) {
            return;
        }
        result.error(format!("Unknown team: {}", team));
        if self.fuzzy {
            let close = suggest(team, &context.available_teams);
            if !close.is_empty() {
                result.suggestion(format!("Did you mean {} instead of {}?", close.join(" or "), team));
            }
        }
    }
}

fn check_tasks(tasks: &[String], context: &CommandContext, result: &mut ValidationResult) {
    for task in tasks {
        if !context.has_task(task) {
            result.warning(format!("Task {} is not in the loaded task list", task));
        }
    }
}
