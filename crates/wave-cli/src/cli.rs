//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Version with git hash and build date, e.g. "0.3.0 (abc1234, 2026-01-29)".
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// wavectl - parse and dispatch wave coordination commands
#[derive(Parser, Debug)]
#[command(name = "wavectl")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to state directory (REPL history)
    #[arg(short, long, env = "WAVE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(flatten)]
    pub context: ContextArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the coordination context comes from.
///
/// `--context` loads a serialized context; otherwise one is built from the
/// individual flags.
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    /// JSON file holding a serialized command context
    #[arg(long = "context", value_name = "FILE")]
    pub context_file: Option<PathBuf>,

    /// Repository the ticket belongs to
    #[arg(long, default_value = "local/waves")]
    pub repo: String,

    /// Ticket number
    #[arg(long, default_value_t = 1)]
    pub issue: u64,

    /// Ticket title; "Wave <n>" sets the current wave
    #[arg(long)]
    pub title: Option<String>,

    /// Known teams, comma separated (names get a "team-" prefix)
    #[arg(long, value_delimiter = ',')]
    pub teams: Vec<String>,

    /// Loaded tasks, comma separated
    #[arg(long, value_delimiter = ',')]
    pub tasks: Vec<String>,

    /// Author of the comment
    #[arg(long)]
    pub actor: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a comment and print the structured commands
    Parse {
        /// Comment text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse a comment and validate every command against the context
    Validate {
        /// Comment text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run the full pipeline and print the response
    Dispatch {
        /// Comment text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only report success when every command succeeds
        #[arg(long)]
        strict: bool,
    },

    /// Show command templates and grammar names
    Patterns,

    /// Start interactive REPL mode
    Repl,
}

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Returns the state directory path, using default if not specified.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".wave-commander"))
                .unwrap_or_else(|| PathBuf::from(".wave-commander"))
        })
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args enters REPL mode
        let cli = Cli::parse_from(["wavectl"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.context.repo, "local/waves");
        assert_eq!(cli.context.issue, 1);
    }

    #[test]
    fn test_cli_parse_dispatch() {
        let cli = Cli::parse_from(["wavectl", "dispatch", "start", "wave", "3", "--strict"]);
        match cli.command {
            Some(Commands::Dispatch { text, format, strict }) => {
                assert_eq!(text.join(" "), "start wave 3");
                assert_eq!(format, OutputFormat::Text);
                assert!(strict);
            }
            _ => panic!("Expected Dispatch command"),
        }
    }

    #[test]
    fn test_cli_context_flags() {
        let cli = Cli::parse_from([
            "wavectl",
            "--teams",
            "alpha,beta",
            "--tasks",
            "1,2,3",
            "--issue",
            "42",
            "parse",
            "start wave 1",
            "--format",
            "json",
        ]);
        assert_eq!(cli.context.teams, vec!["alpha", "beta"]);
        assert_eq!(cli.context.tasks, vec!["1", "2", "3"]);
        assert_eq!(cli.context.issue, 42);
        match cli.command {
            Some(Commands::Parse { format, .. }) => assert_eq!(format, OutputFormat::Json),
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["wavectl", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
