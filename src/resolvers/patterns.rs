//! Word lists shared by the resolvers.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Words that carry no topical signal in an event request.
pub static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // General English
        "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "as", "is", "was", "are", "were", "be", "been", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "can", "may", "might", "must", "need",
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my",
        "your", "our", "their", "this", "that", "these", "those", "what", "which", "who", "how",
        "when", "where", "why", "all", "any", "each", "every", "some", "such", "no", "not",
        "only", "just", "very", "too", "also", "now", "here", "there", "up", "out", "into",
        "about", "than", "then", "if", "so", "something", "anything", "please", "pls", "want",
        "looking", "look", "find", "get", "give", "show", "shows", "suggest", "recommend",
        "know", "like", "going", "go", "happening", "happen", "plan", "plans", "good", "great",
        "nice", "cool", "fun", "best", "top", "few", "couple", "many", "lots", "several",
        "one", "two", "three", "four", "five",
        // Event-request framing
        "event", "events", "things", "thing", "stuff", "options", "option", "ideas", "idea",
        "near", "nearby", "around", "area", "city", "town", "local", "within", "km", "kms",
        "today", "tonight", "tomorrow", "weekend", "week", "month", "next", "evening",
        "morning", "afternoon", "night", "day", "days", "free", "cheap", "affordable", "budget",
        "under", "below", "less", "max", "price", "entry", "ticket", "tickets", "rs", "inr",
        "friends", "people", "someone", "anyone", "attend", "check", "visit", "pick", "picks",
    ]
    .into_iter()
    .collect()
});

/// Words that end a place-name capture ("in Indiranagar *this friday*").
pub static PLACE_BOUNDARY_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "this", "next", "tonight", "today", "tomorrow", "weekend", "on", "for", "with", "and",
        "or", "under", "below", "within", "from", "at", "to", "that", "which", "where", "who",
        "these", "during", "between", "before", "after", "around", "near", "free", "cheap",
        "just", "only", "please", "pls", "events", "event", "top", "best", "less", "max",
        "budget", "is", "are", "the", "evening", "morning", "afternoon", "night", "monday",
        "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "january",
        "february", "march", "april", "may", "june", "july", "august", "september", "october",
        "november", "december", "i", "we", "me", "if", "but", "any", "some", "happening",
    ]
    .into_iter()
    .collect()
});

/// Place captures that never name a real place.
pub static GENERIC_PLACES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "me", "area", "my area", "town", "my city", "city", "here", "there", "general",
        "person", "total", "advance", "mind", "life", "front", "time", "case",
    ]
    .into_iter()
    .collect()
});

/// English number words accepted where a count is expected.
pub fn number_word(word: &str) -> Option<u64> {
    let n = match word {
        "one" | "a single" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        _ => return None,
    };
    Some(n)
}

/// Regex alternation matching the words recognised by [`number_word`].
pub const NUMBER_WORDS_PATTERN: &str = "one|two|three|four|five|six|seven|eight|nine|ten|\
    eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty";

/// Parses digits or a number word.
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    s.parse::<u64>().ok().or_else(|| number_word(s))
}

/// Parses a price such as `1,500` or `499.50`.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lowercased alphanumeric tokens, keeping inner hyphens.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|w| w.trim_matches('-').to_lowercase())
        .filter(|w| !w.is_empty())
}

/// Finds `needle` in `haystack` on word boundaries, returning the byte offset.
pub fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(start);
        }
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}
