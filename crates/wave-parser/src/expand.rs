//! List and range expansion for team and task lists.
//!
//! ```text
//! "1-3"              -> team-1, team-2, team-3   (team list)
//! "1-3"              -> 1, 2, 3                  (task list)
//! "alpha, beta & 4"  -> team-alpha, team-beta, team-4
//! "#12, w1.t004"     -> 12, w1.t004
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Prefix of canonical team ids.
pub const TEAM_PREFIX: &str = "team-";

/// Ranges wider than this are passed through as a single token.
pub const MAX_RANGE_SPAN: u64 = 1000;

static RANGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)$").expect("Invalid range regex"));

static LIST_SPLIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("Invalid list split regex"));

/// Words that join list items rather than name them.
const CONNECTORS: &[&str] = &["and", "&", "or"];

/// Expands a team list fragment into canonical team ids (duplicates kept).
pub fn expand_team_list(text: &str) -> Vec<String> {
    let mut teams = Vec::new();
    for token in list_tokens(text, &["team", "teams"]) {
        match numeric_range(token) {
            Some(range) => teams.extend(range.map(|n| format!("{}{}", TEAM_PREFIX, n))),
            None => teams.push(normalize_team_id(token)),
        }
    }
    teams
}

/// Expands a task list fragment into task ids (duplicates kept).
///
/// Digit ranges become individual numbers; everything else is kept verbatim.
pub fn expand_task_list(text: &str) -> Vec<String> {
    let mut tasks = Vec::new();
    for token in list_tokens(text, &["task", "tasks"]) {
        match numeric_range(token) {
            Some(range) => tasks.extend(range.map(|n| n.to_string())),
            None => tasks.push(token.to_string()),
        }
    }
    tasks
}

/// Canonical form of a team token: lower-case with a `team-` prefix.
pub fn normalize_team_id(token: &str) -> String {
    let token = token.trim().trim_start_matches('#').to_lowercase();
    if token.starts_with(TEAM_PREFIX) {
        token
    } else {
        format!("{}{}", TEAM_PREFIX, token)
    }
}

/// Removes duplicates, keeping first occurrences in order.
pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Splits a list fragment, dropping connectors, marker words and `#` prefixes.
fn list_tokens<'a>(text: &'a str, markers: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
    LIST_SPLIT_REGEX
        .split(text.trim())
        .map(|token| token.trim_start_matches('#').trim_matches('"'))
        .filter(move |token| {
            !token.is_empty()
                && !CONNECTORS.contains(&token.to_ascii_lowercase().as_str())
                && !markers.contains(&token.to_ascii_lowercase().as_str())
        })
}

/// Inclusive numeric range for `start-end` tokens; descending ranges count down.
fn numeric_range(token: &str) -> Option<Box<dyn Iterator<Item = u64>>> {
    let caps = RANGE_REGEX.captures(token)?;
    let start: u64 = caps[1].parse().ok()?;
    let end: u64 = caps[2].parse().ok()?;
    if start.abs_diff(end) > MAX_RANGE_SPAN {
        return None;
    }
    if start <= end {
        Some(Box::new(start..=end))
    } else {
        Some(Box::new((end..=start).rev()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_range() {
        assert_eq!(expand_team_list("1-3"), vec!["team-1", "team-2", "team-3"]);
    }

    #[test]
    fn test_task_range() {
        assert_eq!(expand_task_list("1-3"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_team_list_mixed() {
        assert_eq!(
            expand_team_list("alpha, beta and team-gamma & 4"),
            vec!["team-alpha", "team-beta", "team-gamma", "team-4"]
        );
    }

    #[test]
    fn test_team_marker_words_dropped() {
        assert_eq!(expand_team_list("team alpha, team beta"), vec!["team-alpha", "team-beta"]);
        assert_eq!(expand_team_list("#7"), vec!["team-7"]);
    }

    #[test]
    fn test_hyphenated_names_not_expanded() {
        assert_eq!(expand_team_list("front-end"), vec!["team-front-end"]);
        assert_eq!(expand_task_list("w1.t001-w1.t003"), vec!["w1.t001-w1.t003"]);
    }

    #[test]
    fn test_task_list_verbatim() {
        assert_eq!(
            expand_task_list("#12, w1.t004 and task 5-6"),
            vec!["12", "w1.t004", "5", "6"]
        );
    }

    #[test]
    fn test_duplicates_permitted() {
        assert_eq!(expand_task_list("1, 1-2"), vec!["1", "1", "2"]);
    }

    #[test]
    fn test_descending_range() {
        assert_eq!(expand_task_list("3-1"), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_oversized_range_passes_through() {
        assert_eq!(expand_task_list("1-50000"), vec!["1-50000"]);
    }

    #[test]
    fn test_dedup_preserving_order() {
        let items = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_preserving_order(items), vec!["b", "a"]);
    }

    #[test]
    fn test_empty_fragment() {
        assert!(expand_team_list("").is_empty());
        assert!(expand_task_list(" , and ").is_empty());
    }
}
