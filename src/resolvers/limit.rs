//! Limit resolver.
//!
//! An explicit count always wins, whether written as digits or as a number
//! word (`top 5`, `five best gigs`, `show me 3`). Otherwise a qualitative
//! phrase picks 1, 3 or 10. Results are clamped to `[1, 20]`.

#![allow(clippy::expect_used)]

use super::patterns::{NUMBER_WORDS_PATTERN, parse_count};
use crate::models::{Extraction, MAX_LIMIT, MIN_LIMIT};
use regex::Regex;
use std::sync::LazyLock;

/// Result count when the request names none.
pub const DEFAULT_LIMIT: usize = 3;

static EXPLICIT_COUNT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let n = format!(r"(\d{{1,6}}|{NUMBER_WORDS_PATTERN})");
    [
        format!(r"(?i)\btop\s+{n}\b"),
        format!(
            r"(?i)\b{n}\s+(?:best|good|great|top|cool|fun|free|cheap|events?|picks?|options?|suggestions?|recommendations?|ideas?|things|places|shows?|gigs?|concerts?|parties|results?)\b"
        ),
        format!(r"(?i)\b(?:give|show|find|suggest|recommend|send|list)\s+(?:me\s+|us\s+)?{n}\b"),
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static regex"))
    .collect()
});

/// (pattern, count), checked in order.
static QUALITATIVE: LazyLock<Vec<(Regex, usize)>> = LazyLock::new(|| {
    [
        (
            r"(?i)\b(just\s+one|only\s+one|the\s+best|the\s+top\s+one|single|one\s+(?:good|great)\s+option)\b",
            1,
        ),
        (r"(?i)\b(a\s+few|some|a\s+couple|couple\s+of|handful)\b", 3),
        (
            r"(?i)\b(many|lots|lots\s+of|a\s+lot|several|all|plenty|bunch|loads)\b",
            10,
        ),
    ]
    .into_iter()
    .map(|(pattern, count)| (Regex::new(pattern).expect("static regex"), count))
    .collect()
});

/// Resolves how many results to return, clamped to `[1, 20]`.
///
/// `default` is used when the request names no count; it is clamped too.
pub fn resolve_limit(text: &str, default: usize) -> Extraction<usize> {
    let explicit = EXPLICIT_COUNT.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| parse_count(&m.as_str().to_lowercase()))
    });
    if let Some(count) = explicit {
        let clamped = clamp(usize::try_from(count).unwrap_or(MAX_LIMIT));
        return Extraction::detected(clamped, 0.95, format!("explicit count {count}"));
    }

    for (pattern, count) in QUALITATIVE.iter() {
        if let Some(m) = pattern.find(text) {
            return Extraction::detected(
                *count,
                0.8,
                format!("qualitative phrase '{}'", m.as_str().to_lowercase()),
            );
        }
    }

    Extraction::fallback(clamp(default), 0.5, "no count requested; default")
}

fn clamp(count: usize) -> usize {
    count.clamp(MIN_LIMIT, MAX_LIMIT)
}
