//! Dispatcher configuration.
//!
//! # Environment Variables
//!
//! - `WAVE_SUCCESS_POLICY`: `any` (default) or `all`
//! - every parser variable listed in [`wave_parser::config`]

use std::fmt;
use std::str::FromStr;

use tracing::warn;
use wave_parser::ParserConfig;

/// Environment variable for the success policy.
pub const SUCCESS_POLICY_ENV: &str = "WAVE_SUCCESS_POLICY";

/// When a dispatch with several commands counts as successful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuccessPolicy {
    /// At least one command succeeded.
    #[default]
    AnySucceeded,
    /// Every command succeeded (and there was at least one).
    AllSucceeded,
}

impl SuccessPolicy {
    /// Applies the policy to dispatch counters.
    pub fn is_success(&self, successful: usize, total: usize) -> bool {
        match self {
            SuccessPolicy::AnySucceeded => successful > 0,
            SuccessPolicy::AllSucceeded => total > 0 && successful == total,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuccessPolicy::AnySucceeded => "any",
            SuccessPolicy::AllSucceeded => "all",
        }
    }
}

impl fmt::Display for SuccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuccessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "any_succeeded" | "lenient" => Ok(SuccessPolicy::AnySucceeded),
            "all" | "all_succeeded" | "strict" => Ok(SuccessPolicy::AllSucceeded),
            other => Err(format!("unknown success policy: {}", other)),
        }
    }
}

/// Configuration for a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    /// Parser tunables; the confidence threshold is shared with validation.
    pub parser: ParserConfig,
    pub success_policy: SuccessPolicy,
}

impl DispatchConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `WAVE_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            parser: ParserConfig::from_env(),
            ..Self::default()
        };
        if let Ok(raw) = std::env::var(SUCCESS_POLICY_ENV) {
            match raw.parse() {
                Ok(policy) => config.success_policy = policy,
                Err(err) => warn!(value = %raw, "Ignoring {}: {}", SUCCESS_POLICY_ENV, err),
            }
        }
        config
    }

    /// Sets the parser configuration.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Sets the success policy.
    pub fn with_success_policy(mut self, policy: SuccessPolicy) -> Self {
        self.success_policy = policy;
        self
    }
}
