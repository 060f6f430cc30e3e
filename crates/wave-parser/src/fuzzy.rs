//! Edit-distance suggestions for unrecognized identifiers.
//!
//! Suggestions are advisory strings for the requester; they never change
//! how a command is parsed or whether it validates.

/// Maximum suggestions returned.
pub const MAX_SUGGESTIONS: usize = 3;

/// Maximum edit distance for a typo suggestion.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Levenshtein distance over characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggests valid identifiers close to `input`.
///
/// Identifiers that contain `input` (or are contained in it) win,
/// case-insensitively; otherwise identifiers within
/// [`MAX_EDIT_DISTANCE`] edits are returned, closest first. At most
/// [`MAX_SUGGESTIONS`] are returned.
///
/// # Example
/// ```
/// use wave_parser::fuzzy::suggest;
///
/// let teams = ["team-alpha", "team-beta"];
/// assert_eq!(suggest("team-alpah", teams), vec!["team-alpha"]);
/// ```
pub fn suggest<I, S>(input: &str, valid: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<String> = valid.into_iter().map(|v| v.as_ref().to_string()).collect();

    let containing: Vec<String> = candidates
        .iter()
        .filter(|c| {
            let lower = c.to_lowercase();
            lower != needle && (lower.contains(&needle) || needle.contains(&lower))
        })
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect();
    if !containing.is_empty() {
        return containing;
    }

    let mut close: Vec<(usize, String)> = candidates
        .into_iter()
        .filter_map(|c| {
            let distance = levenshtein(&needle, &c.to_lowercase());
            (distance > 0 && distance <= MAX_EDIT_DISTANCE).then_some((distance, c))
        })
        .collect();
    close.sort();
    close
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, c)| c)
        .collect()
}
