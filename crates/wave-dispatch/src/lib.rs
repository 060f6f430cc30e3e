//! Validation and execution of parsed wave coordination commands.
//!
//! The [`Dispatcher`] drives the whole pipeline for one comment: parse with
//! [`wave_parser::CommandParser`], validate each command against the
//! [`CommandContext`](wave_models::CommandContext), execute the valid ones
//! into action lists, and aggregate everything into a
//! [`CommandDispatchResult`](wave_models::CommandDispatchResult) that
//! [`render_response`] turns into a ticket comment.

pub mod balance;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod render;
pub mod validator;

pub use balance::{plan_distribution, DistributionPlan};
pub use config::{DispatchConfig, SuccessPolicy};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, ExecutionError, Result};
pub use executor::CommandExecutor;
pub use render::render_response;
pub use validator::Validator;
