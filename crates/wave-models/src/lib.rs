//! Core data models for wave coordination commands.
//!
//! This crate provides the types shared by the parser, the dispatcher and
//! the CLI: parsed commands and their payloads, the coordination context a
//! command is interpreted against, and the result structures reported back
//! to the requester.

pub mod builders;
pub mod command;
pub mod context;
pub mod result;

// Re-export main types
pub use builders::CommandContextBuilder;
pub use command::{
    BalanceStrategy, BatchOperation, BlockingRelation, CommandKind, CommandParameters,
    LoadBalanceOperation, ParsedCommand, Priority, SyncOperation, SyncTrigger, TaskAssignment,
    TeamAssignment, WaveStart,
};
pub use context::{extract_wave_number, CommandContext, ContextError, UNKNOWN_ACTOR};
pub use result::{
    CommandAction, CommandDispatchResult, CommandExecutionResult, DispatchMetadata, ParseMetadata,
    ParseResult, ValidationResult,
};
