//! Draft selection from free-text editor feedback.
//!
//! The editor answers in prose, so the choice is recovered by a cascade of
//! increasingly loose extraction rules. The first rule that yields an
//! in-range index wins; if none does, the first draft is used.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Explicit recommendation phrasings, tried in order.
const PHRASE_PATTERNS: [&str; 10] = [
    r"select draft (\d+)",
    r"choose draft (\d+)",
    r"recommend draft (\d+)",
    r"i recommend draft (\d+)",
    r"draft (\d+) should be selected",
    r"selected draft (\d+)",
    r"best.*draft (\d+)",
    r"draft (\d+).*best",
    r"choose.*draft (\d+)",
    r"select.*draft (\d+)",
];

static PHRASES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    PHRASE_PATTERNS
        .iter()
        .map(|p| (*p, Regex::new(&format!("(?i){p}")).unwrap()))
        .collect()
});

static ORDINALS: LazyLock<Vec<(Regex, usize)>> = LazyLock::new(|| {
    [
        r"\b(first|1st)\b",
        r"\b(second|2nd)\b",
        r"\b(third|3rd)\b",
        r"\b(fourth|4th)\b",
        r"\b(fifth|5th)\b",
    ]
    .iter()
    .enumerate()
    .map(|(index, p)| (Regex::new(&format!("(?i){p}")).unwrap(), index))
    .collect()
});

static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)draft (\d+)").unwrap());

/// Which cascade rule produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    /// An explicit recommendation phrase, e.g. `recommend draft (\d+)`.
    Phrase(&'static str),
    /// An ordinal word such as "second" or "3rd".
    Ordinal,
    /// The last `draft N` mentioned anywhere in the response.
    LastMention,
    /// Nothing usable; fell back to the first draft.
    Default,
}

impl std::fmt::Display for SelectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionRule::Phrase(p) => write!(f, "phrase /{p}/"),
            SelectionRule::Ordinal => f.write_str("ordinal"),
            SelectionRule::LastMention => f.write_str("last mention"),
            SelectionRule::Default => f.write_str("default"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Zero-based, always `< count` when `count > 0`.
    pub index: usize,
    pub rule: SelectionRule,
}

/// 1-based draft number to 0-based index, if it names one of `count` drafts.
fn in_range(number: &str, count: usize) -> Option<usize> {
    let n: usize = number.parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

fn by_phrase(response: &str, count: usize) -> Option<Selection> {
    PHRASES.iter().find_map(|(pattern, re)| {
        // Only the first match of each phrase counts.
        let number = re.captures(response)?.get(1)?.as_str();
        let index = in_range(number, count)?;
        Some(Selection { index, rule: SelectionRule::Phrase(*pattern) })
    })
}

fn by_ordinal(response: &str, count: usize) -> Option<Selection> {
    ORDINALS
        .iter()
        .find(|(re, index)| *index < count && re.is_match(response))
        .map(|(_, index)| Selection { index: *index, rule: SelectionRule::Ordinal })
}

fn by_last_mention(response: &str, count: usize) -> Option<Selection> {
    let last = MENTION.captures_iter(response).last()?;
    let index = in_range(last.get(1)?.as_str(), count)?;
    Some(Selection { index, rule: SelectionRule::LastMention })
}

/// Recover the editor's chosen draft from `response` among `count` drafts.
///
/// Never fails: unparseable feedback selects index 0 with a warning.
pub fn select_draft(response: &str, count: usize) -> Selection {
    by_phrase(response, count)
        .or_else(|| by_ordinal(response, count))
        .or_else(|| by_last_mention(response, count))
        .unwrap_or_else(|| {
            warn!(count, "Could not parse editor recommendation, defaulting to first draft");
            Selection { index: 0, rule: SelectionRule::Default }
        })
}
