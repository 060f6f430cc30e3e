//! Template hints for text that matched no grammar, and per-kind help.

use wave_models::CommandKind;

use crate::fuzzy::levenshtein;

/// Maximum templates suggested for one unparsed segment.
pub const MAX_TEMPLATE_HINTS: usize = 3;

/// Help information for a command kind.
pub struct CommandHelp {
    pub kind: CommandKind,
    /// Brief one-line description.
    pub brief: &'static str,
    /// Usage template shown as a suggestion.
    pub template: &'static str,
    /// Words that hint at this kind.
    pub keywords: &'static [&'static str],
    /// Example comments.
    pub examples: &'static [&'static str],
}

/// Static help entries, in pattern-table order.
static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        kind: CommandKind::WaveStart,
        brief: "Start a wave",
        template: "start wave <name> [with teams <team-list>]",
        keywords: &["start", "begin", "launch", "kickoff", "wave"],
        examples: &["start wave 3 with teams 1-4", "wave 2 go"],
    },
    CommandHelp {
        kind: CommandKind::TeamAssign,
        brief: "Assign teams to tasks",
        template: "assign teams <team-list> to tasks <task-list> [with <priority> priority]",
        keywords: &["assign", "give", "allocate", "delegate"],
        examples: &[
            "assign team-alpha to task 1",
            "delegate tasks W1.T001, W1.T002 to team beta with high priority",
        ],
    },
    CommandHelp {
        kind: CommandKind::TaskAssign,
        brief: "Move a task to another team",
        template: "reassign task <id> to team <team> [with <priority> priority]",
        keywords: &["reassign", "move", "transfer", "take"],
        examples: &["move task W1.T003 to team gamma", "have team beta take over task 7"],
    },
    CommandHelp {
        kind: CommandKind::TeamBlock,
        brief: "Block a team on another team",
        template: "block team <team> on team <team> [until <condition>]",
        keywords: &["block", "blocked", "wait", "waits", "depend", "depends"],
        examples: &["block team-a on team-b until api is merged", "team 3 waits for team 1"],
    },
    CommandHelp {
        kind: CommandKind::TeamSync,
        brief: "Synchronize teams on a condition",
        template: "sync teams <team-list> on <condition>",
        keywords: &["sync", "synchronize", "synchronise", "coordinate"],
        examples: &["sync teams alpha, beta on deploy", "coordinate teams 1-3 after completion"],
    },
    CommandHelp {
        kind: CommandKind::LoadBalance,
        brief: "Rebalance work across teams",
        template: "balance load across teams <team-list> [using round_robin|capacity_based|priority_weighted]",
        keywords: &["balance", "rebalance", "distribute", "spread", "load"],
        examples: &[
            "balance load across teams 1-4",
            "distribute tasks across teams a, b using capacity based max 5 per team",
        ],
    },
    CommandHelp {
        kind: CommandKind::BatchOperation,
        brief: "Run several commands in order",
        template: "<command>; <command> | <command> and then <command>",
        keywords: &[],
        examples: &["start wave 2; assign team a to task 1 then sync teams a, b on done"],
    },
];

/// Help for every command kind.
pub fn command_help() -> &'static [CommandHelp] {
    COMMAND_HELP
}

/// Help for one command kind.
pub fn help_for(kind: CommandKind) -> Option<&'static CommandHelp> {
    COMMAND_HELP.iter().find(|h| h.kind == kind)
}

/// Suggests up to three templates for a segment that matched nothing.
///
/// A kind is suggested when one of its keywords appears in the segment as a
/// word (or prefix of a word, so "synchronizing" still hints at sync). With
/// `fuzzy` enabled, words within edit distance 1 of a keyword also count,
/// which catches typos such as "asign" or "blcok".
pub fn template_hints(segment: &str, fuzzy: bool) -> Vec<String> {
    let words: Vec<&str> = segment
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1)
        .collect();

    COMMAND_HELP
        .iter()
        .filter(|help| {
            help.keywords.iter().any(|keyword| {
                words.iter().any(|word| {
                    word.starts_with(keyword)
                        || (fuzzy && keyword.len() > 3 && levenshtein(word, keyword) <= 1)
                })
            })
        })
        .take(MAX_TEMPLATE_HINTS)
        .map(|help| help.template.to_string())
        .collect()
}
