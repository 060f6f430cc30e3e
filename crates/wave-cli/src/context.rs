//! Building the command context from CLI flags or a JSON file.

use std::fs;

use tracing::debug;
use wave_models::{CommandContext, CommandContextBuilder};
use wave_parser::normalize_team_id;

use crate::cli::ContextArgs;
use crate::commands::Result;

/// Loads the context named by `--context`, or builds one from the flags.
pub fn load_context(args: &ContextArgs) -> Result<CommandContext> {
    if let Some(path) = &args.context_file {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read context file {}: {}", path.display(), e))?;
        let context: CommandContext = serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid context file {}: {}", path.display(), e))?;
        debug!(path = %path.display(), teams = context.available_teams.len(), "Loaded context file");
        return Ok(context);
    }

    let mut builder = CommandContextBuilder::new(args.repo.as_str(), args.issue)
        .teams(args.teams.iter().filter(|t| !t.trim().is_empty()).map(|t| normalize_team_id(t)))
        .tasks(args.tasks.iter().map(|t| t.trim()).filter(|t| !t.is_empty()));
    if let Some(title) = &args.title {
        builder = builder.title(title);
    }
    if let Some(actor) = &args.actor {
        builder = builder.actor(actor.as_str());
    }
    Ok(builder.build())
}

/// One-paragraph description of a context for the REPL.
pub fn describe_context(context: &CommandContext) -> String {
    let list = |items: Vec<&str>| {
        if items.is_empty() {
            "(none)".to_string()
        } else {
            items.join(", ")
        }
    };
    format!(
        "Repository: {}#{}\nCurrent wave: {}\nActor: {}\nTeams: {}\nTasks: {}",
        context.repository,
        context.issue_number,
        context
            .current_wave
            .map(|w| w.to_string())
            .unwrap_or_else(|| "(none)".to_string()),
        context.resolve_actor(),
        list(context.available_teams.iter().map(String::as_str).collect()),
        list(context.available_tasks.iter().map(String::as_str).collect()),
    )
}
