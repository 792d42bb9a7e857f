//! Model-based fallback stage.
//!
//! The model sees the whole vocabulary and the request. Its answer is data,
//! not truth: every returned name is checked against the taxonomy and
//! unknown names are dropped without error.

use super::{CascadeInput, TagMatch, TagSource};
use crate::llm::{MAX_INTERESTS, MAX_PRIMARY, MAX_SECONDARY, TagSuggestion};
use crate::models::Extraction;
use crate::taxonomy::{Taxonomy, TaxonomyLevel};

/// Fixed confidence reported for validated model suggestions.
pub(super) const LLM_CONFIDENCE: f32 = 0.75;

pub(super) fn llm_stage(input: &CascadeInput<'_>) -> Option<Extraction<TagMatch>> {
    let provider = input.llm?;

    let suggestion = match provider.suggest_tags(input.taxonomy, input.text) {
        Ok(suggestion) => suggestion,
        Err(err) => {
            tracing::warn!(provider = provider.name(), error = %err, "Model tag fallback failed");
            metrics::counter!("llm_tag_fallback_total", "status" => "error").increment(1);
            return None;
        },
    };

    let value = validate(input.taxonomy, &suggestion);
    if value.is_empty() {
        tracing::debug!(
            provider = provider.name(),
            "No model-suggested tag survived validation"
        );
        metrics::counter!("llm_tag_fallback_total", "status" => "empty").increment(1);
        return None;
    }

    metrics::counter!("llm_tag_fallback_total", "status" => "success").increment(1);
    let reasoning = if suggestion.reasoning.trim().is_empty() {
        format!("classified by {}", provider.name())
    } else {
        format!("classified by {}: {}", provider.name(), suggestion.reasoning.trim())
    };
    Some(Extraction::detected(value, LLM_CONFIDENCE, reasoning))
}

/// Keeps known names in canonical spelling, within the per-level limits.
fn validate(taxonomy: &Taxonomy, suggestion: &TagSuggestion) -> TagMatch {
    let mut value = TagMatch::with_source(TagSource::Llm);
    let levels = [
        (TaxonomyLevel::Primary, &suggestion.primary, MAX_PRIMARY),
        (TaxonomyLevel::Secondary, &suggestion.secondary, MAX_SECONDARY),
        (TaxonomyLevel::Interest, &suggestion.interests, MAX_INTERESTS),
    ];

    for (level, names, limit) in levels {
        let mut kept = 0;
        for name in names {
            if kept == limit {
                break;
            }
            if let Some(entry) = taxonomy.lookup(level, name) {
                let before = level_len(&value, level);
                value.add(taxonomy, level, entry.name);
                if level_len(&value, level) > before {
                    kept += 1;
                    value.matched.push(entry.name.to_string());
                }
            } else {
                tracing::debug!(level = %level, name = %name, "Dropping unknown model tag");
            }
        }
    }

    // Secondary or interest names without any valid primary imply their parents.
    if value.primary.is_empty() {
        let parents: Vec<String> = value
            .secondary
            .iter()
            .map(|n| (TaxonomyLevel::Secondary, n))
            .chain(value.interests.iter().map(|n| (TaxonomyLevel::Interest, n)))
            .filter_map(|(level, n)| taxonomy.lookup(level, n))
            .map(|entry| entry.primary.to_string())
            .collect();
        for parent in parents.iter().take(MAX_PRIMARY) {
            value.add(taxonomy, TaxonomyLevel::Primary, parent);
        }
    }

    value
}

fn level_len(value: &TagMatch, level: TaxonomyLevel) -> usize {
    match level {
        TaxonomyLevel::Primary => value.primary.len(),
        TaxonomyLevel::Secondary => value.secondary.len(),
        TaxonomyLevel::Interest => value.interests.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::llm::LlmProvider;

    struct CannedLlm(&'static str);

    impl LlmProvider for CannedLlm {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn complete(&self, _prompt: &str) -> crate::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingLlm;

    impl LlmProvider for FailingLlm {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn complete(&self, _prompt: &str) -> crate::Result<String> {
            Err(Error::operation("complete", "timeout"))
        }
    }

    fn run(llm: &dyn LlmProvider) -> Option<Extraction<TagMatch>> {
        llm_stage(&CascadeInput {
            text: "something unusual",
            taxonomy: Taxonomy::builtin(),
            llm: Some(llm),
        })
    }

    #[test]
    fn test_unknown_names_are_dropped() {
        let llm = CannedLlm(
            r#"{"primary": ["music", "Underwater Basket Weaving"], "secondary": ["Jazz/Blues"], "interests": [], "reasoning": "jazzy"}"#,
        );
        let result = run(&llm).unwrap();
        assert_eq!(result.value.primary, vec!["Music"]);
        assert_eq!(result.value.secondary, vec!["Jazz/Blues"]);
        assert_eq!(result.value.source, TagSource::Llm);
        assert!((result.confidence - LLM_CONFIDENCE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_limits_are_enforced() {
        let llm = CannedLlm(
            r#"{"primary": ["Music", "Comedy", "Festivals", "Nightlife", "Food & Drink"],
                "interests": ["Jazz", "Blues", "Techno", "House", "Trance", "Rap", "Sufi"]}"#,
        );
        let result = run(&llm).unwrap();
        assert_eq!(result.value.primary.len(), MAX_PRIMARY);
        assert_eq!(result.value.interests.len(), MAX_INTERESTS);
    }

    #[test]
    fn test_nothing_valid_falls_through() {
        let llm = CannedLlm(r#"{"primary": ["Basket Weaving"]}"#);
        assert!(run(&llm).is_none());
    }

    #[test]
    fn test_provider_failure_falls_through() {
        assert!(run(&FailingLlm).is_none());
    }

    #[test]
    fn test_parents_fill_missing_primary() {
        let llm = CannedLlm(r#"```json
{"primary": [], "interests": ["Pottery", "Ceramics"]}
```"#);
        let result = run(&llm).unwrap();
        assert_eq!(result.value.interests, vec!["Ceramics"]);
        assert_eq!(result.value.primary, vec!["Workshops & Classes"]);
    }

    #[test]
    fn test_no_provider_skips_stage() {
        let result = llm_stage(&CascadeInput {
            text: "anything",
            taxonomy: Taxonomy::builtin(),
            llm: None,
        });
        assert!(result.is_none());
    }
}
