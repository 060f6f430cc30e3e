//! wavectl library.
//!
//! Command-line interface and interactive REPL around the wave command
//! dispatcher.

pub mod cli;
pub mod commands;
pub mod context;
pub mod repl;
