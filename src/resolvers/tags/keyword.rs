//! Keyword fallback: substring match of request tokens against every
//! taxonomy name.

use super::{CascadeInput, TagMatch, TagSource};
use crate::models::Extraction;
use crate::resolvers::patterns::{STOP_WORDS, tokens};
use crate::taxonomy::TaxonomyLevel;

/// Confidence when a secondary category or interest matched.
const SPECIFIC_CONFIDENCE: f32 = 0.7;
/// Confidence when only primary categories matched.
const PRIMARY_ONLY_CONFIDENCE: f32 = 0.55;
/// Tokens must be longer than this.
const MIN_TOKEN_CHARS: usize = 2;

pub(super) fn keyword_stage(input: &CascadeInput<'_>) -> Option<Extraction<TagMatch>> {
    let mut keywords: Vec<String> = tokens(input.text)
        .filter(|t| t.chars().count() > MIN_TOKEN_CHARS && !STOP_WORDS.contains(t.as_str()))
        .collect();
    keywords.dedup();
    if keywords.is_empty() {
        return None;
    }

    let mut value = TagMatch::with_source(TagSource::Keyword);
    for entry in input.taxonomy.entries() {
        let name = entry.name.to_lowercase();
        let Some(token) = keywords.iter().find(|k| name.contains(k.as_str())) else {
            continue;
        };
        value.add(input.taxonomy, entry.level, entry.name);
        if entry.level != TaxonomyLevel::Primary {
            value.add(input.taxonomy, TaxonomyLevel::Primary, entry.primary);
        }
        let note = format!("'{token}' in {}", entry.name);
        value.matched.push(note);
    }

    if value.is_empty() {
        return None;
    }

    let specific = !value.secondary.is_empty() || !value.interests.is_empty();
    let confidence = if specific {
        SPECIFIC_CONFIDENCE
    } else {
        PRIMARY_ONLY_CONFIDENCE
    };
    let reasoning = format!("keyword match: {}", value.matched.join("; "));
    Some(Extraction::detected(value, confidence, reasoning))
}
