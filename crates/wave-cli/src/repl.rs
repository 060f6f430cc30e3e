//! Interactive REPL for dispatching comments against one context.

use std::fs;
use std::path::{Path, PathBuf};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::debug;
use wave_dispatch::{render_response, Dispatcher};
use wave_models::CommandContext;
use wave_parser::{command_help, CommandHelp};

use crate::commands::{self, format_parse_result, patterns_text};
use crate::context::describe_context;

/// Tab completion for slash commands.
struct CommandCompleter;

impl CommandCompleter {
    const COMMANDS: &'static [&'static str] =
        &["/context", "/help", "/parse", "/patterns", "/quit"];
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = Self::COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Slash commands available in the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Show help (optionally for one command kind)
    Help(Option<String>),
    /// Describe the loaded context
    Context,
    /// List templates and grammars
    Patterns,
    /// Parse without validating or executing
    Parse(String),
    /// Quit the REPL
    Quit,
    /// Unknown command
    Unknown(String),
    /// A comment to dispatch
    Text(String),
}

impl ReplCommand {
    /// Parses input into a REPL command.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        let Some(stripped) = input.strip_prefix('/') else {
            return ReplCommand::Text(input.to_string());
        };

        let parts: Vec<&str> = stripped.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let arg = parts
            .get(1)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match cmd.as_str() {
            "help" | "h" | "?" => ReplCommand::Help(arg),
            "context" | "ctx" => ReplCommand::Context,
            "patterns" | "p" => ReplCommand::Patterns,
            "parse" => arg
                .map(ReplCommand::Parse)
                .unwrap_or(ReplCommand::Unknown("parse requires a comment".to_string())),
            "quit" | "q" | "exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(cmd),
        }
    }
}

/// REPL state
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    dispatcher: Dispatcher,
    context: CommandContext,
    history_path: PathBuf,
}

impl Repl {
    /// Creates a new REPL instance.
    pub fn new(
        state_dir: &Path,
        dispatcher: Dispatcher,
        context: CommandContext,
    ) -> commands::Result<Self> {
        let config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(CommandCompleter));

        fs::create_dir_all(state_dir)?;
        let history_path = state_dir.join("repl_history.txt");
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        Ok(Self {
            editor,
            dispatcher,
            context,
            history_path,
        })
    }

    /// Runs the REPL loop.
    pub fn run(&mut self) -> commands::Result<()> {
        println!("wavectl REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type a comment to dispatch it, /help for commands, /quit to exit");
        println!();

        loop {
            match self.editor.readline("wave> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(&line)?;

                    let cmd = ReplCommand::parse(&line);
                    debug!(?cmd, "Parsed command");

                    match respond(&self.dispatcher, &self.context, cmd) {
                        Some(output) => println!("{}", output.trim_end()),
                        None => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        let _ = self.editor.save_history(&self.history_path);
        println!("Goodbye!");
        Ok(())
    }
}

/// Output for one REPL command, or `None` when the REPL should exit.
fn respond(dispatcher: &Dispatcher, context: &CommandContext, cmd: ReplCommand) -> Option<String> {
    let output = match cmd {
        ReplCommand::Help(None) => help_text(),
        ReplCommand::Help(Some(topic)) => match find_help(&topic) {
            Some(help) => kind_help_text(help),
            None => format!("No help for '{}'. Try /patterns for every command.", topic),
        },
        ReplCommand::Context => describe_context(context),
        ReplCommand::Patterns => patterns_text(),
        ReplCommand::Parse(text) => format_parse_result(&dispatcher.parse(&text, context)),
        ReplCommand::Quit => return None,
        ReplCommand::Unknown(msg) => format!("Unknown command: {}. Type /help", msg),
        ReplCommand::Text(text) => render_response(&dispatcher.dispatch(&text, context)),
    };
    Some(output)
}

fn help_text() -> String {
    let mut out = String::from("Commands:\n");
    out.push_str("  /help [kind]     Show help, or templates for one command kind\n");
    out.push_str("  /context         Show the loaded repository, wave, teams and tasks\n");
    out.push_str("  /patterns        List every template and grammar\n");
    out.push_str("  /parse <text>    Parse a comment without running it\n");
    out.push_str("  /quit            Exit the REPL\n");
    out.push_str("\nAnything else is dispatched as a comment, e.g. \"start wave 3 with teams 1-4\".\n");
    out.push_str("Command kinds: ");
    let kinds: Vec<&str> = command_help().iter().map(|h| h.kind.as_str()).collect();
    out.push_str(&kinds.join(", "));
    out.push('\n');
    out
}

/// Finds help by kind name ("team_sync") or keyword ("sync").
fn find_help(topic: &str) -> Option<&'static CommandHelp> {
    let topic = topic.trim().to_lowercase();
    command_help()
        .iter()
        .find(|h| h.kind.as_str() == topic)
        .or_else(|| {
            command_help()
                .iter()
                .find(|h| h.keywords.contains(&topic.as_str()))
        })
}

fn kind_help_text(help: &CommandHelp) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} - {}\n", help.kind, help.brief));
    out.push_str(&format!("Usage: {}\n", help.template));
    if !help.examples.is_empty() {
        out.push_str("Examples:\n");
        for example in help.examples {
            out.push_str(&format!("  {}\n", example));
        }
    }
    out
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

    #[test]
    fn test_parse_slash_commands() {
        assert_eq!(ReplCommand::parse("/help"), ReplCommand::Help(None));
        assert_eq!(
            ReplCommand::parse("/h sync"),
            ReplCommand::Help(Some("sync".to_string()))
        );
        assert_eq!(ReplCommand::parse("/context"), ReplCommand::Context);
        assert_eq!(ReplCommand::parse("/P"), ReplCommand::Patterns);
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
    }

    #[test]
    fn test_parse_parse_command() {
        assert_eq!(
            ReplCommand::parse("/parse start wave 2"),
            ReplCommand::Parse("start wave 2".to_string())
        );
        assert!(matches!(ReplCommand::parse("/parse"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn test_parse_unknown_and_text() {
        assert_eq!(
            ReplCommand::parse("/frobnicate"),
            ReplCommand::Unknown("frobnicate".to_string())
        );
        assert_eq!(
            ReplCommand::parse("  start wave 2  "),
            ReplCommand::Text("start wave 2".to_string())
        );
    }

    #[test]
    fn test_respond_dispatches_text() {
        let out = respond(
            &Dispatcher::default(),
            &context(),
            ReplCommand::Text("start wave 2".to_string()),
        )
        .unwrap();
        assert!(out.starts_with("## ✅ Commands processed"));
        assert!(out.contains("Started wave 2"));
    }

    #[test]
    fn test_respond_quit() {
        assert!(respond(&Dispatcher::default(), &context(), ReplCommand::Quit).is_none());
    }

    #[test]
    fn test_help_lookup() {
        let out = respond(
            &Dispatcher::default(),
            &context(),
            ReplCommand::Help(Some("start".to_string())),
        )
        .unwrap();
        assert!(out.starts_with("wave_start - Start a wave"));

        let out = respond(
            &Dispatcher::default(),
            &context(),
            ReplCommand::Help(Some("dance".to_string())),
        )
        .unwrap();
        assert!(out.starts_with("No help for 'dance'"));
    }

    #[test]
    fn test_completer_matches_prefix() {
        use rustyline::completion::Completer;

        let completer = CommandCompleter;
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);

        let (pos, matches) = completer.complete("/pa", 3, &ctx).unwrap();
        assert_eq!(pos, 0);
        let names: Vec<&str> = matches.iter().map(|m| m.display.as_str()).collect();
        assert_eq!(names, vec!["/parse", "/patterns"]);
    }

    #[test]
    fn test_completer_non_slash_ignored() {
        use rustyline::completion::Completer;

        let completer = CommandCompleter;
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);

        let (_, matches) = completer.complete("start", 5, &ctx).unwrap();
        assert!(matches.is_empty());
    }
}
