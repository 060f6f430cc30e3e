//! Command handlers for CLI subcommands.

use tracing::info;
use wave_dispatch::{render_response, DispatchConfig, Dispatcher, SuccessPolicy};
use wave_models::{CommandContext, ParseResult, ParsedCommand};
use wave_parser::{command_help, PatternTable};

use crate::cli::{Commands, OutputFormat};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command and print its output.
pub fn execute(command: Commands, context: &CommandContext, config: DispatchConfig) -> Result<()> {
    let output = run(command, context, config)?;
    print!("{}", output);
    Ok(())
}

/// Execute a CLI command, returning what would be printed.
pub fn run(command: Commands, context: &CommandContext, config: DispatchConfig) -> Result<String> {
    match command {
        Commands::Parse { text, format } => {
            let dispatcher = Dispatcher::new(config)?;
            cmd_parse(&dispatcher, &text.join(" "), context, format)
        }
        Commands::Validate { text, format } => {
            let dispatcher = Dispatcher::new(config)?;
            cmd_validate(&dispatcher, &text.join(" "), context, format)
        }
        Commands::Dispatch {
            text,
            format,
            strict,
        } => {
            let config = if strict {
                config.with_success_policy(SuccessPolicy::AllSucceeded)
            } else {
                config
            };
            let dispatcher = Dispatcher::new(config)?;
            cmd_dispatch(&dispatcher, &text.join(" "), context, format)
        }
        Commands::Patterns => Ok(patterns_text()),
        // REPL is handled separately in main
        Commands::Repl => Ok(String::new()),
    }
}

fn cmd_parse(
    dispatcher: &Dispatcher,
    text: &str,
    context: &CommandContext,
    format: OutputFormat,
) -> Result<String> {
    let parsed = dispatcher.parse(text, context);
    info!(commands = parsed.commands.len(), errors = parsed.errors.len(), "Parsed input");

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&parsed)? + "\n"),
        OutputFormat::Text => Ok(format_parse_result(&parsed)),
    }
}

fn cmd_validate(
    dispatcher: &Dispatcher,
    text: &str,
    context: &CommandContext,
    format: OutputFormat,
) -> Result<String> {
    let parsed = dispatcher.parse(text, context);
    let reports: Vec<_> = flatten(&parsed.commands)
        .into_iter()
        .map(|command| (command, dispatcher.validate(command, context)))
        .collect();

    if format == OutputFormat::Json {
        let json: Vec<serde_json::Value> = reports
            .iter()
            .map(|(command, validation)| {
                serde_json::json!({
                    "command": command,
                    "validation": validation,
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&serde_json::json!({
            "results": json,
            "errors": parsed.errors,
            "warnings": parsed.warnings,
        }))? + "\n");
    }

    let mut out = String::new();
    for (command, validation) in &reports {
        let mark = if validation.valid { "✓" } else { "✗" };
        out.push_str(&format!("{} {} [{}]\n", mark, command.summary(), command.kind));
        for error in &validation.errors {
            out.push_str(&format!("    error: {}\n", error));
        }
        for warning in &validation.warnings {
            out.push_str(&format!("    warning: {}\n", warning));
        }
        for suggestion in &validation.suggestions {
            out.push_str(&format!("    hint: {}\n", suggestion));
        }
    }
    append_messages(&mut out, &parsed.errors, &parsed.warnings);
    Ok(out)
}

fn cmd_dispatch(
    dispatcher: &Dispatcher,
    text: &str,
    context: &CommandContext,
    format: OutputFormat,
) -> Result<String> {
    let result = dispatcher.dispatch(text, context);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&result)? + "\n"),
        OutputFormat::Text => Ok(render_response(&result)),
    }
}

/// Templates, grammar names and examples for every command kind.
pub fn patterns_text() -> String {
    let table = PatternTable::builtin();
    let mut out = String::new();

    for help in command_help() {
        out.push_str(&format!("{} - {}\n", help.kind, help.brief));
        out.push_str(&format!("  usage:    {}\n", help.template));
        let grammars: Vec<&str> = table.for_kind(help.kind).map(|p| p.name).collect();
        if !grammars.is_empty() {
            out.push_str(&format!("  grammars: {}\n", grammars.join(", ")));
        }
        for example in help.examples {
            out.push_str(&format!("  e.g.      {}\n", example));
        }
        out.push('\n');
    }
    out
}

/// Human-readable parse result.
pub fn format_parse_result(parsed: &ParseResult) -> String {
    let mut out = String::new();
    for command in &parsed.commands {
        write_command(&mut out, command, 0);
    }
    if parsed.commands.is_empty() {
        out.push_str("No commands parsed\n");
    }
    out.push_str(&format!(
        "confidence {:.2}, ambiguity {:.2}, {:.2} ms\n",
        parsed.metadata.confidence, parsed.metadata.ambiguity_score, parsed.metadata.parse_time_ms
    ));
    append_messages(&mut out, &parsed.errors, &parsed.warnings);
    out
}

fn write_command(out: &mut String, command: &ParsedCommand, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!(
        "{}{} ({:.2}): {}\n",
        indent,
        command.kind,
        command.confidence,
        command.summary()
    ));
    if let Some(members) = command.batch_members() {
        for member in members {
            write_command(out, member, depth + 1);
        }
    }
    for alternative in &command.alternatives {
        out.push_str(&format!(
            "{}  or {} ({:.2}): {}\n",
            indent,
            alternative.kind,
            alternative.confidence,
            alternative.summary()
        ));
    }
}

fn append_messages(out: &mut String, errors: &[String], warnings: &[String]) {
    for error in errors {
        out.push_str(&format!("error: {}\n", error));
    }
    for warning in warnings {
        out.push_str(&format!("warning: {}\n", warning));
    }
}

/// Commands with parser-built batches expanded into their members.
fn flatten(commands: &[ParsedCommand]) -> Vec<&ParsedCommand> {
    commands
        .iter()
        .flat_map(|command| match command.batch_members() {
            Some(members) => members.iter().collect::<Vec<_>>(),
            None => vec![command],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_models::CommandContextBuilder;

    fn context() -> CommandContext {
        CommandContextBuilder::new("acme/platform", 8)
            .teams(["team-alpha", "team-beta"])
            .tasks(["1", "2"])
            .build()
    }

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_text_output() {
        let command = Commands::Parse {
            text: words("start wave 2; assign alpha to 1"),
            format: OutputFormat::Text,
        };
        let out = run(command, &context(), DispatchConfig::default()).unwrap();

        assert!(out.starts_with("batch_operation ("));
        assert!(out.contains("): batch of 2 commands\n"));
        assert!(out.contains("  wave_start (0.90): start wave 2\n"));
        assert!(out.contains("    or team_assign ("));
    }

    #[test]
    fn test_parse_json_output() {
        let command = Commands::Parse {
            text: words("start wave 2"),
            format: OutputFormat::Json,
        };
        let out = run(command, &context(), DispatchConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["commands"][0]["kind"], "wave_start");
        assert_eq!(value["commands"][0]["parameters"]["type"], "wave_start");
    }

    #[test]
    fn test_validate_output() {
        let command = Commands::Validate {
            text: words("assign team gamma to task 1 then sync teams alpha, beta on deploy"),
            format: OutputFormat::Text,
        };
        let out = run(command, &context(), DispatchConfig::default()).unwrap();

        assert!(out.contains("✗ assign team-gamma to tasks 1"));
        assert!(out.contains("    error: Unknown team: team-gamma"));
        assert!(out.contains("✓ sync team-alpha, team-beta on deploy"));
    }

    #[test]
    fn test_dispatch_strict() {
        let text = words("start wave 2; assign team gamma to task 1");
        let lenient = run(
            Commands::Dispatch {
                text: text.clone(),
                format: OutputFormat::Json,
                strict: false,
            },
            &context(),
            DispatchConfig::default(),
        )
        .unwrap();
        let strict = run(
            Commands::Dispatch {
                text,
                format: OutputFormat::Json,
                strict: true,
            },
            &context(),
            DispatchConfig::default(),
        )
        .unwrap();

        let lenient: serde_json::Value = serde_json::from_str(&lenient).unwrap();
        let strict: serde_json::Value = serde_json::from_str(&strict).unwrap();
        assert_eq!(lenient["success"], true);
        assert_eq!(strict["success"], false);
    }

    #[test]
    fn test_patterns_lists_every_kind() {
        let out = patterns_text();
        assert!(out.contains("wave_start - Start a wave"));
        assert!(out.contains("grammars: team_sync, team_sync_bare"));
        assert!(out.contains("batch_operation - Run several commands in order"));
    }
}
