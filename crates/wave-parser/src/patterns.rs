//! Grammar table mapping command kinds to their phrasings.
//!
//! Each [`CommandKind`] owns several regex grammars. Capture groups are
//! consumed positionally: the `slots` of a [`Pattern`] name the role of
//! each group, in order, so the parameter builder never has to guess what
//! group 2 means for a given phrasing.
//!
//! Grammars are written against normalized text (see
//! [`Normalizer`](crate::preprocess::Normalizer)): lower-case, single
//! spaces, `team-x` already rewritten to `team x`.

use std::sync::OnceLock;

use regex::Regex;
use wave_models::CommandKind;

/// Role of a capture group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Wave name or number.
    Wave,
    /// Team list fragment.
    Teams,
    /// Task list fragment.
    Tasks,
    /// Single task id.
    Task,
    /// Priority word.
    Priority,
    /// Team list of the blocked side.
    BlockedTeams,
    /// Team list of the blocking side.
    BlockingTeams,
    /// Word introducing a condition (`until`, `on`, `after`, ...).
    Connector,
    /// Free-text condition.
    Condition,
    /// Balancing strategy phrase.
    Strategy,
    /// Per-team task cap.
    MaxPerTeam,
}

/// A compiled grammar for one phrasing of a command kind.
#[derive(Debug)]
pub struct Pattern {
    /// Human-readable name for this pattern.
    pub name: &'static str,
    /// Kind produced when this pattern matches.
    pub kind: CommandKind,
    /// Role of each capture group, in group order.
    pub slots: &'static [Slot],
    regex: Regex,
}

impl Pattern {
    /// Creates a new pattern.
    ///
    /// Panics if the grammar does not compile; the built-in table is fixed
    /// text and is covered by tests.
    pub fn new(name: &'static str, kind: CommandKind, grammar: &str, slots: &'static [Slot]) -> Self {
        let regex = Regex::new(grammar).expect("Invalid grammar pattern");
        debug_assert_eq!(
            regex.captures_len() - 1,
            slots.len(),
            "slot count mismatch for pattern {}",
            name
        );
        Self {
            name,
            kind,
            slots,
            regex,
        }
    }

    /// Checks if the pattern matches the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Extracts slot values from a match; unmatched optional groups are absent.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captured<'t>> {
        self.regex.captures(text).map(|caps| Captured {
            values: self
                .slots
                .iter()
                .enumerate()
                .filter_map(|(i, slot)| caps.get(i + 1).map(|m| (*slot, m.as_str())))
                .collect(),
        })
    }

    /// The underlying grammar source.
    pub fn grammar(&self) -> &str {
        self.regex.as_str()
    }
}

/// Slot values captured from one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured<'t> {
    values: Vec<(Slot, &'t str)>,
}

impl<'t> Captured<'t> {
    /// First non-blank value for a slot.
    pub fn get(&self, slot: Slot) -> Option<&'t str> {
        self.values
            .iter()
            .find(|(s, v)| *s == slot && !v.trim().is_empty())
            .map(|(_, v)| v.trim())
    }
}

/// Kind-intrinsic confidence of a match.
///
/// Batches are synthetic; their confidence is the mean of their members.
pub fn base_confidence(kind: CommandKind) -> f64 {
    match kind {
        CommandKind::WaveStart => 0.9,
        CommandKind::TeamAssign | CommandKind::TaskAssign => 0.85,
        CommandKind::TeamBlock | CommandKind::LoadBalance => 0.8,
        CommandKind::TeamSync => 0.75,
        CommandKind::BatchOperation => 0.0,
    }
}

/// One team, optionally introduced by "team".
const TEAM_ITEM: &str = r"(?:teams?\s+)?#?[a-z0-9_.\-]+";
/// One task, optionally introduced by "task".
const TASK_ITEM: &str = r"(?:tasks?\s+)?#?[a-z0-9_.\-]+";
/// Separators inside a list.
const LIST_SEP: &str = r"(?:\s*,\s*|\s*&\s*|\s+and\s+)";
const PRIORITY: &str = r"(?:\s+(?:with|at|as)\s+(low|normal|medium|high|critical|urgent)(?:\s+priority)?)?";
const CONDITION: &str = r"(?:\s+(?:(until|when|because|for|after)\s+)?(.+))?";
const STRATEGY: &str = r"(?:\s+(?:using|with|by|via)\s+(round[\s_-]?robin|capacity(?:[\s_-]based)?|priority(?:[\s_-]weighted)?)(?:\s+strategy)?)?";
const MAX_PER_TEAM: &str = r"(?:\s+max(?:imum)?\s+(\d+)\s+(?:tasks?\s+)?per\s+team)?";

fn team_list() -> String {
    format!("({item}(?:{sep}{item})*)", item = TEAM_ITEM, sep = LIST_SEP)
}

fn task_list() -> String {
    format!("({item}(?:{sep}{item})*)", item = TASK_ITEM, sep = LIST_SEP)
}

/// Build default grammars, grouped by kind in table order.
pub fn default_patterns() -> Vec<Pattern> {
    let teams = team_list();
    let tasks = task_list();

    vec![
        // Wave start
        Pattern::new(
            "wave_start",
            CommandKind::WaveStart,
            &format!(
                r"^(?:start|launch|begin|kick\s*off)\s+(?:the\s+)?wave\s+#?([a-z0-9_.\-]+)(?:\s+(?:with|using|for)\s+{teams})?$"
            ),
            &[Slot::Wave, Slot::Teams],
        ),
        Pattern::new(
            "wave_start_postfix",
            CommandKind::WaveStart,
            &format!(
                r"^wave\s+#?([a-z0-9_.\-]+)\s+(?:starts?|launch(?:es)?|begins?|go(?:es)?)(?:\s+(?:with|using|for)\s+{teams})?$"
            ),
            &[Slot::Wave, Slot::Teams],
        ),
        // Team assignment
        Pattern::new(
            "team_assign",
            CommandKind::TeamAssign,
            &format!(r"^(?:assign|give)\s+{teams}\s+(?:to|with)\s+{tasks}{PRIORITY}$"),
            &[Slot::Teams, Slot::Tasks, Slot::Priority],
        ),
        Pattern::new(
            "team_assign_inverse",
            CommandKind::TeamAssign,
            &format!(r"^(?:allocate|delegate|assign|give)\s+{tasks}\s+to\s+{teams}{PRIORITY}$"),
            &[Slot::Tasks, Slot::Teams, Slot::Priority],
        ),
        // Task reassignment
        Pattern::new(
            "task_reassign",
            CommandKind::TaskAssign,
            &format!(
                r"^(?:reassign|move|transfer)\s+(?:tasks?\s+)?#?([a-z0-9_.\-]+)\s+(?:over\s+)?to\s+{teams}{PRIORITY}$"
            ),
            &[Slot::Task, Slot::Teams, Slot::Priority],
        ),
        Pattern::new(
            "task_takeover",
            CommandKind::TaskAssign,
            &format!(
                r"^(?:let|have)\s+{teams}\s+(?:take\s+over|take|own|handle)\s+(?:tasks?\s+)?#?([a-z0-9_.\-]+){PRIORITY}$"
            ),
            &[Slot::Teams, Slot::Task, Slot::Priority],
        ),
        // Blocking
        Pattern::new(
            "team_block",
            CommandKind::TeamBlock,
            &format!(r"^block\s+{teams}\s+(?:on|by)\s+{teams}{CONDITION}$"),
            &[Slot::BlockedTeams, Slot::BlockingTeams, Slot::Connector, Slot::Condition],
        ),
        Pattern::new(
            "team_block_relation",
            CommandKind::TeamBlock,
            &format!(
                r"^{teams}\s+(?:waits?\s+(?:for|on)|depends?\s+on|blocks?\s+on|(?:is|are)\s+blocked\s+(?:by|on))\s+{teams}{CONDITION}$"
            ),
            &[Slot::BlockedTeams, Slot::BlockingTeams, Slot::Connector, Slot::Condition],
        ),
        // Sync
        Pattern::new(
            "team_sync",
            CommandKind::TeamSync,
            &format!(
                r"^(?:sync|synchronize|synchronise|coordinate)\s+{teams}\s+(on|when|after|at|before)\s+(.+)$"
            ),
            &[Slot::Teams, Slot::Connector, Slot::Condition],
        ),
        Pattern::new(
            "team_sync_bare",
            CommandKind::TeamSync,
            &format!(r"^(?:sync|synchronize|synchronise|coordinate)\s+{teams}$"),
            &[Slot::Teams],
        ),
        // Load balancing
        Pattern::new(
            "load_balance",
            CommandKind::LoadBalance,
            &format!(
                r"^(?:balance|distribute|rebalance|spread)(?:\s+(?:the\s+)?(?:load|work(?:load)?|tasks))?(?:\s+(?:across|between|among|over))?\s+{teams}{STRATEGY}{MAX_PER_TEAM}$"
            ),
            &[Slot::Teams, Slot::Strategy, Slot::MaxPerTeam],
        ),
        Pattern::new(
            "load_balance_level",
            CommandKind::LoadBalance,
            &format!(
                r"^(?:even\s+out|level)\s+(?:the\s+)?(?:load|work(?:load)?)\s+(?:across|between|among|for)\s+{teams}{STRATEGY}{MAX_PER_TEAM}$"
            ),
            &[Slot::Teams, Slot::Strategy, Slot::MaxPerTeam],
        ),
    ]
}

/// Ordered, immutable registry of grammars.
///
/// Built once and shared read-only between parser instances.
#[derive(Debug)]
pub struct PatternTable {
    patterns: Vec<Pattern>,
}

impl PatternTable {
    /// Creates a table from patterns, keeping their order.
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// The built-in table, compiled on first use.
    pub fn builtin() -> &'static PatternTable {
        static TABLE: OnceLock<PatternTable> = OnceLock::new();
        TABLE.get_or_init(|| PatternTable::new(default_patterns()))
    }

    /// All patterns in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Patterns for one kind, in table order.
    pub fn for_kind(&self, kind: CommandKind) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter().filter(move |p| p.kind == kind)
    }

    /// Kinds that have at least one grammar, in table order.
    pub fn kinds(&self) -> Vec<CommandKind> {
        let mut kinds = Vec::new();
        for pattern in &self.patterns {
            if !kinds.contains(&pattern.kind) {
                kinds.push(pattern.kind);
            }
        }
        kinds
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
