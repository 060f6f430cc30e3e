//! Error types for the dispatch crate.

use thiserror::Error;
use wave_models::CommandKind;
use wave_parser::ParseError;

/// Faults raised by a command handler.
///
/// The dispatcher converts these into failed execution results; they never
/// reach the caller of `dispatch`.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// No handler exists for this command.
    #[error("unsupported command type: {0}")]
    UnsupportedCommand(String),

    /// The payload belongs to a different kind than the command claims.
    #[error("parameters for {found} do not match command kind {kind}")]
    ParameterMismatch {
        kind: CommandKind,
        found: CommandKind,
    },

    /// A batch without members.
    #[error("batch operation contains no commands")]
    EmptyBatch,
}

/// Errors that stop a dispatch before any command runs.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The context cannot be used to report results.
    #[error("invalid command context: {0}")]
    InvalidContext(String),

    /// Parser construction failed.
    #[error("parser error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for handler operations.
pub type Result<T> = std::result::Result<T, ExecutionError>;
