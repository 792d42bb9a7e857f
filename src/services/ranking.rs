//! Local filtering and relevance ranking of catalog candidates.

use crate::models::{Budget, RankedEvent};
use std::collections::BTreeSet;

/// Query tokens shorter than this are ignored when scoring.
const MIN_TOKEN_LEN: usize = 3;

const NAME_WEIGHT: u32 = 3;
const TAG_WEIGHT: u32 = 2;
const DESCRIPTION_WEIGHT: u32 = 1;

/// Keeps events whose tags or category contain any of `tags`, ignoring case.
///
/// An empty tag set keeps everything.
pub fn filter_by_tags(events: Vec<RankedEvent>, tags: &BTreeSet<String>) -> Vec<RankedEvent> {
    if tags.is_empty() {
        return events;
    }
    let wanted: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
    events
        .into_iter()
        .filter(|ranked| {
            let event = &ranked.event;
            event
                .tags
                .iter()
                .chain(event.category.as_ref())
                .map(|label| label.to_lowercase())
                .any(|label| wanted.iter().any(|tag| label.contains(tag.as_str())))
        })
        .collect()
}

/// Keeps events whose price satisfies `budget`; unpriced events are kept.
pub fn filter_by_budget(events: Vec<RankedEvent>, budget: &Budget) -> Vec<RankedEvent> {
    if !budget.is_constraining() {
        return events;
    }
    events
        .into_iter()
        .filter(|ranked| budget.accepts(ranked.event.price))
        .collect()
}

/// Relevance of one event to the query tokens.
///
/// Each token scores 3 for a name hit, 2 for a tag hit and 1 for a
/// description hit.
#[must_use]
pub fn relevance_score(event: &RankedEvent, tokens: &[String]) -> u32 {
    let name = event.event.name.to_lowercase();
    let description = event.event.description.to_lowercase();
    let tags: Vec<String> = event.event.tags.iter().map(|t| t.to_lowercase()).collect();

    tokens
        .iter()
        .map(|token| {
            let mut score = 0;
            if name.contains(token.as_str()) {
                score += NAME_WEIGHT;
            }
            if tags.iter().any(|tag| tag.contains(token.as_str())) {
                score += TAG_WEIGHT;
            }
            if description.contains(token.as_str()) {
                score += DESCRIPTION_WEIGHT;
            }
            score
        })
        .sum()
}

/// Splits a query into lowercase scoring tokens.
#[must_use]
pub fn query_tokens(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
        .collect()
}

/// Sorts events by descending relevance to `query`.
///
/// The sort is stable, so ties keep the catalog order. A query without
/// scoring tokens leaves the order untouched.
pub fn rank_by_relevance(events: &mut [RankedEvent], query: &str) {
    let tokens = query_tokens(query);
    if tokens.is_empty() {
        return;
    }
    events.sort_by_cached_key(|event| std::cmp::Reverse(relevance_score(event, &tokens)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEvent;

    fn ranked(event: CatalogEvent) -> RankedEvent {
        RankedEvent {
            event,
            distance_km: None,
            tracked_url: String::new(),
        }
    }

    fn tags(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_tag_filter_matches_tags_and_category() {
        let events = vec![
            ranked(CatalogEvent::new("1", "a").with_tags(["live music"])),
            ranked(CatalogEvent::new("2", "b").with_category("MUSIC")),
            ranked(CatalogEvent::new("3", "c").with_tags(["comedy"])),
            ranked(CatalogEvent::new("4", "d")),
        ];
        let kept = filter_by_tags(events, &tags(&["Music"]));
        let ids: Vec<&str> = kept.iter().map(|e| e.event.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn test_tag_filter_skipped_without_tags() {
        let events = vec![ranked(CatalogEvent::new("1", "a"))];
        assert_eq!(filter_by_tags(events, &BTreeSet::new()).len(), 1);
    }

    #[test]
    fn test_budget_filter() {
        let events = vec![
            ranked(CatalogEvent::new("free", "a").with_price(0.0)),
            ranked(CatalogEvent::new("paid", "b").with_price(800.0)),
            ranked(CatalogEvent::new("unknown", "c")),
        ];
        let kept = filter_by_budget(events.clone(), &Budget::free());
        let ids: Vec<&str> = kept.iter().map(|e| e.event.id.as_str()).collect();
        assert_eq!(ids, ["free", "unknown"]);

        assert_eq!(filter_by_budget(events, &Budget::any()).len(), 3);
    }

    #[test]
    fn test_relevance_weights() {
        let event = ranked(
            CatalogEvent::new("1", "Jazz Night")
                .with_tags(["jazz"])
                .with_description("an evening of jazz"),
        );
        let tokens = query_tokens("jazz");
        assert_eq!(relevance_score(&event, &tokens), 6);
    }

    #[test]
    fn test_short_tokens_ignored() {
        assert_eq!(query_tokens("DJ at a pub in goa"), ["pub", "goa"]);
    }

    #[test]
    fn test_rank_is_stable_and_descending() {
        let mut events = vec![
            ranked(CatalogEvent::new("1", "Pottery class")),
            ranked(CatalogEvent::new("2", "Rooftop jazz")),
            ranked(CatalogEvent::new("3", "Board games")),
            ranked(CatalogEvent::new("4", "Jazz brunch").with_tags(["jazz"])),
        ];
        rank_by_relevance(&mut events, "jazz");
        let ids: Vec<&str> = events.iter().map(|e| e.event.id.as_str()).collect();
        assert_eq!(ids, ["4", "2", "1", "3"]);
    }
}
