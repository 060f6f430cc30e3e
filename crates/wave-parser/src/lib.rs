//! Natural-language command parsing for wave coordination comments.
//!
//! Turns loosely phrased ticket comments into [`ParsedCommand`]s:
//!
//! - [`preprocess`]: case, quote and whitespace folding
//! - [`segment`]: splitting multi-command comments
//! - [`patterns`]: the grammar table, several phrasings per command kind
//! - [`expand`]: team/task list and range expansion
//! - [`fuzzy`]: edit-distance suggestions for unknown identifiers
//! - [`hints`]: command templates and help
//!
//! [`ParsedCommand`]: wave_models::ParsedCommand

pub mod config;
pub mod error;
pub mod expand;
pub mod fuzzy;
pub mod hints;
pub mod parser;
pub mod patterns;
pub mod preprocess;
pub mod segment;

pub use config::ParserConfig;
pub use error::{ParseError, Result};
pub use expand::{expand_task_list, expand_team_list, normalize_team_id};
pub use fuzzy::{levenshtein, suggest};
pub use hints::{command_help, help_for, template_hints, CommandHelp};
pub use parser::{CommandParser, DEFAULT_BLOCK_CONDITION, MAX_TASKS_PER_TEAM};
pub use patterns::{base_confidence, Pattern, PatternTable, Slot};
