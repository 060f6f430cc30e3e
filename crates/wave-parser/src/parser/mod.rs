//! Comment parser: normalization, segmentation and grammar matching.
//!
//! A comment is normalized once, split into segments, and every segment is
//! matched against every grammar in the [`PatternTable`]. Each match is a
//! candidate; the highest-confidence candidate wins (ties go to table
//! order) and the rest are kept as ranked alternatives.

mod params;


use std::cmp::Ordering;
use std::time::Instant;

use tracing::{debug, trace, warn};
use wave_models::{CommandContext, CommandKind, ParseMetadata, ParseResult, ParsedCommand};

use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::hints::template_hints;
use crate::patterns::{base_confidence, PatternTable};
use crate::preprocess::Normalizer;
use crate::segment::split_segments;

pub use params::{DEFAULT_BLOCK_CONDITION, MAX_TASKS_PER_TEAM};

/// A chosen command plus notes produced while building it.
struct Matched {
    command: ParsedCommand,
    notes: Vec<String>,
}

/// Parses free-text comments into structured commands.
///
/// Parsers are immutable after construction and can be shared between
/// threads; the grammar table is compiled once per process.
#[derive(Debug)]
pub struct CommandParser {
    config: ParserConfig,
    normalizer: Normalizer,
    table: &'static PatternTable,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self {
            config: ParserConfig::default(),
            normalizer: Normalizer::default(),
            table: PatternTable::builtin(),
        }
    }
}

impl CommandParser {
    /// Creates a parser, validating the config and compiling its vocabulary.
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(&config.custom_vocabulary)?;
        Ok(Self {
            config,
            normalizer,
            table: PatternTable::builtin(),
        })
    }

    /// Parses a whole comment.
    ///
    /// Never fails: unparseable segments are reported in `errors` (with
    /// hints in `warnings`) and the remaining segments are still parsed.
    /// Several commands are wrapped into one batch command.
    pub fn parse(&self, input: &str, context: &CommandContext) -> ParseResult {
        let started = Instant::now();
        let normalized = self.normalizer.normalize(input);
        let segments = split_segments(&normalized);

        if segments.is_empty() {
            debug!("Empty command input");
            let mut result = ParseResult::failed(vec![ParseError::EmptyInput.to_string()]);
            result.metadata.parse_time_ms = elapsed_ms(started);
            return result;
        }

        let actor = context.resolve_actor();
        let mut commands = Vec::new();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for segment in &segments {
            match self.match_segment(segment, &actor) {
                Ok(matched) => {
                    warnings.extend(matched.notes);
                    commands.push(matched.command);
                }
                Err(err) => {
                    warn!(segment = %segment, "No grammar matched segment");
                    warnings.push(failure_hint(&err));
                    errors.push(err.to_string());
                }
            }
        }

        let metadata = ParseMetadata {
            parse_time_ms: 0.0,
            confidence: mean(commands.iter().map(|c| c.confidence)),
            ambiguity_score: mean(commands.iter().map(|c| c.alternatives.len() as f64)),
        };

        if commands.len() > 1 {
            debug!(members = commands.len(), "Wrapping commands into a batch");
            commands = vec![ParsedCommand::batch(commands, actor)];
        }

        let mut result = ParseResult {
            commands,
            errors,
            warnings,
            metadata,
        };
        result.metadata.parse_time_ms = elapsed_ms(started);
        debug!(
            commands = result.commands.len(),
            errors = result.errors.len(),
            confidence = result.metadata.confidence,
            "Parsed comment"
        );
        result
    }

    /// Parses a single command segment without batching.
    pub fn parse_segment(&self, segment: &str, context: &CommandContext) -> Result<ParsedCommand> {
        let normalized = self.normalizer.normalize(segment);
        if normalized.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        self.match_segment(&normalized, &context.resolve_actor())
            .map(|matched| matched.command)
    }

    fn match_segment(&self, segment: &str, actor: &str) -> Result<Matched> {
        let mut candidates: Vec<Matched> = Vec::new();

        for pattern in self.table.iter() {
            let Some(caps) = pattern.captures(segment) else {
                continue;
            };
            match params::build_parameters(pattern.kind, &caps) {
                Some(built) => {
                    trace!(pattern = pattern.name, kind = %pattern.kind, "Candidate");
                    candidates.push(Matched {
                        command: ParsedCommand::new(
                            segment,
                            actor,
                            built.parameters,
                            base_confidence(pattern.kind),
                        ),
                        notes: built.notes,
                    });
                }
                None => trace!(pattern = pattern.name, "Match produced no usable payload"),
            }
        }

        if candidates.is_empty() {
            return Err(ParseError::NoMatch {
                segment: segment.to_string(),
                suggestions: template_hints(segment, self.config.enable_fuzzy_matching),
                known_kinds: CommandKind::ALL.to_vec(),
            });
        }

        // First candidate with the highest confidence wins.
        let mut best = 0;
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.command.confidence > candidates[best].command.confidence {
                best = i;
            }
        }
        let chosen = candidates.remove(best);

        let mut alternatives: Vec<ParsedCommand> = Vec::new();
        for candidate in candidates {
            let command = candidate.command;
            if command.confidence <= self.config.confidence_threshold
                || command.parameters == chosen.command.parameters
                || alternatives.iter().any(|a| a.parameters == command.parameters)
            {
                continue;
            }
            alternatives.push(command);
        }
        alternatives.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        alternatives.truncate(self.config.max_alternatives);

        debug!(
            segment = %segment,
            kind = %chosen.command.kind,
            confidence = chosen.command.confidence,
            alternatives = alternatives.len(),
            "Parsed segment"
        );

        Ok(Matched {
            command: chosen.command.with_alternatives(alternatives),
            notes: chosen.notes,
        })
    }
}

/// Warning text accompanying a segment failure.
fn failure_hint(err: &ParseError) -> String {
    match err {
        ParseError::NoMatch {
            segment,
            suggestions,
            ..
        } if !suggestions.is_empty() => {
            format!("Did you mean one of these for \"{}\"? {}", segment, suggestions.join(" | "))
        }
        ParseError::NoMatch { known_kinds, .. } => format!(
            "Known commands: {}",
            known_kinds
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        other => other.to_string(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
