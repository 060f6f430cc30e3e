//! Parse -> validate -> execute pipeline with aggregated results.

use std::time::Instant;

use tracing::{debug, error, info};
use wave_models::{
    CommandContext, CommandDispatchResult, CommandExecutionResult, DispatchMetadata,
    ParseResult, ParsedCommand, ValidationResult,
};
use wave_parser::{CommandParser, ParseError};

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::executor::CommandExecutor;
use crate::validator::Validator;

/// Runs comments through the full command pipeline.
///
/// Nothing here returns an error to the caller once constructed: every
/// failure is reported inside the returned result structures.
#[derive(Debug)]
pub struct Dispatcher {
    config: DispatchConfig,
    parser: CommandParser,
    validator: Validator,
    executor: CommandExecutor,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            config: DispatchConfig::default(),
            parser: CommandParser::default(),
            validator: Validator::default(),
            executor: CommandExecutor::new(),
        }
    }
}

impl Dispatcher {
    /// Creates a dispatcher; fails only on an invalid parser configuration.
    pub fn new(config: DispatchConfig) -> Result<Self, DispatchError> {
        let parser = CommandParser::new(config.parser.clone())?;
        let validator = Validator::new(&config.parser);
        Ok(Self {
            config,
            parser,
            validator,
            executor: CommandExecutor::new(),
        })
    }

    /// Parses a comment without validating or executing it.
    pub fn parse(&self, input: &str, context: &CommandContext) -> ParseResult {
        self.parser.parse(input, context)
    }

    /// Validates one command against the context.
    pub fn validate(&self, command: &ParsedCommand, context: &CommandContext) -> ValidationResult {
        self.validator.validate(command, context)
    }

    /// Executes one command, converting handler faults into a failed result.
    pub fn execute(&self, command: &ParsedCommand, context: &CommandContext) -> CommandExecutionResult {
        match self.executor.execute(command, context) {
            Ok(result) => result,
            Err(err) => {
                error!(kind = %command.kind, error = %err, "Command execution failed");
                CommandExecutionResult::failed(
                    command.clone(),
                    format!("Failed to execute {}", command.summary()),
                    err.to_string(),
                )
            }
        }
    }

    /// Parses, validates and executes every command in a comment.
    ///
    /// A batch produced by the parser is expanded so each member is
    /// validated, executed and counted on its own. Success follows the
    /// configured [`SuccessPolicy`](crate::SuccessPolicy).
    pub fn dispatch(&self, input: &str, context: &CommandContext) -> CommandDispatchResult {
        let started = Instant::now();

        if input.trim().is_empty() {
            debug!("Empty command input");
            return CommandDispatchResult::failed(
                vec![ParseError::EmptyInput.to_string()],
                Vec::new(),
                elapsed_ms(started),
            );
        }

        if let Err(err) = context.check() {
            let err = DispatchError::InvalidContext(err.to_string());
            error!(error = %err, "Rejecting dispatch");
            return CommandDispatchResult::failed(vec![err.to_string()], Vec::new(), elapsed_ms(started));
        }

        let parsed = self.parser.parse(input, context);
        let errors = parsed.errors;
        let mut warnings = parsed.warnings;

        let commands: Vec<ParsedCommand> = parsed
            .commands
            .into_iter()
            .flat_map(|command| match command.batch_members() {
                Some(members) => members.to_vec(),
                None => vec![command],
            })
            .collect();

        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            let validation = self.validator.validate(&command, context);

            if !validation.valid {
                debug!(kind = %command.kind, "Skipping invalid command");
                let message = format!("Validation failed for {}", command.summary());
                let error = validation
                    .errors
                    .iter()
                    .chain(&validation.suggestions)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("; ");
                results.push(CommandExecutionResult::failed(command, message, error));
                continue;
            }

            warnings.extend(validation.warnings);
            warnings.extend(validation.suggestions);

            results.push(self.execute(&command, context));
        }

        let total_commands = results.len();
        let successful_commands = results.iter().filter(|r| r.success).count();
        let success = self
            .config
            .success_policy
            .is_success(successful_commands, total_commands);

        info!(
            total = total_commands,
            successful = successful_commands,
            success,
            "Dispatched comment"
        );

        CommandDispatchResult {
            success,
            results,
            errors,
            warnings,
            metadata: DispatchMetadata {
                total_commands,
                successful_commands,
                processing_time_ms: elapsed_ms(started),
            },
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuccessPolicy;
    use wave_models::CommandContextBuilder;

    fn context() -> CommandContext {
        CommandContextBuilder::new("acme/platform", 3)
            .teams(["team-alpha", "team-beta"])
            .tasks(["1", "2"])
            .build()
    }

    #[test]
    fn test_invalid_context_is_reported() {
        let context = CommandContext::new("", 3);
        let result = Dispatcher::default().dispatch("start wave 1", &context);

        assert!(!result.success);
        assert!(result.results.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("invalid command context"));
    }

    #[test]
    fn test_validation_failure_skips_execution() {
        let result = Dispatcher::default().dispatch("assign team gamma to task 1", &context());

        assert!(!result.success);
        assert_eq!(result.results.len(), 1);
        let failed = &result.results[0];
        assert!(!failed.success);
        assert!(failed.actions.is_none());
        assert_eq!(failed.error.as_deref(), Some("Unknown team: team-gamma"));
    }

    #[test]
    fn test_all_succeeded_policy() {
        let config = DispatchConfig::new().with_success_policy(SuccessPolicy::AllSucceeded);
        let dispatcher = Dispatcher::new(config).unwrap();
        let result = dispatcher.dispatch("start wave 2; assign team gamma to task 1", &context());

        assert_eq!(result.metadata.successful_commands, 1);
        assert!(!result.success);
    }

    #[test]
    fn test_execute_converts_faults() {
        let empty = ParsedCommand::batch(Vec::new(), "octocat");
        let result = Dispatcher::default().execute(&empty, &context());

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("batch operation contains no commands"));
    }

    #[test]
    fn test_empty_input_reported_before_context_check() {
        let context = CommandContext::new("acme/platform", 0);
        let result = Dispatcher::default().dispatch("  \n ", &context);

        assert!(!result.success);
        assert_eq!(result.errors, vec!["Empty command input"]);
    }

    #[test]
    fn test_failed_command_keeps_hints_out_of_warnings() {
        let context = CommandContextBuilder::new("acme/platform", 3)
            .teams(["team-alpha", "team-beta", "team-zz"])
            .tasks(["1", "2"])
            .build();
        let result = Dispatcher::default().dispatch("assign team zzz to task 99", &context);

        assert!(!result.success);
        assert_eq!(result.results.len(), 1);
        assert!(result.warnings.is_empty());
        assert_eq!(
            result.results[0].error.as_deref(),
            Some("Unknown team: team-zzz; Did you mean team-zz instead of team-zzz?")
        );
    }

    #[test]
    fn test_unparseable_only() {
        let result = Dispatcher::default().dispatch("looks good to me", &context());

        assert!(!result.success);
        assert_eq!(result.metadata.total_commands, 0);
        assert_eq!(result.errors.len(), 1);
        assert!(!result.warnings.is_empty());
    }
}
