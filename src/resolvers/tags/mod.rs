//! Tag resolver.
//!
//! Maps a request onto taxonomy names through a fixed priority cascade.
//! Each stage shares one contract and the first stage whose confidence
//! clears its threshold wins:
//!
//! | Stage | Source | Confidence | Returns when |
//! |-------|--------|------------|--------------|
//! | 1 | high-priority jargon patterns | 0.9 to 0.95 | ≥ 0.85 |
//! | 2 | general patterns | 0.7 to 0.9 | ≥ 0.7 |
//! | 3 | keyword match against every taxonomy name | 0.55 or 0.7 | ≥ 0.5 |
//! | 4 | language model, validated against the taxonomy | 0.75 | ≥ 0.5 |
//! | 5 | default: empty sets | 0.3 | always |
//!
//! Within the pattern stages every matching pattern contributes: tags are
//! unioned and confidence is the maximum of the contributors, never a sum.
//! Empty tag sets mean "all categories", which is a valid outcome.

mod keyword;
mod llm;
mod patterns;

pub use patterns::{GENERAL_PATTERNS, HIGH_PRIORITY_PATTERNS, TagPattern};

use crate::llm::LlmProvider;
use crate::models::Extraction;
use crate::taxonomy::{Taxonomy, TaxonomyLevel};
use serde::{Deserialize, Serialize};

/// Confidence of the default "no strong signal" outcome.
const DEFAULT_CONFIDENCE: f32 = 0.3;

/// Cascade stage that produced a tag match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    /// Narrow jargon patterns.
    HighPriority,
    /// General patterns.
    Pattern,
    /// Keyword match against the taxonomy.
    Keyword,
    /// Language model classification.
    Llm,
    /// No signal.
    #[default]
    Default,
}

impl TagSource {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HighPriority => "high_priority",
            Self::Pattern => "pattern",
            Self::Keyword => "keyword",
            Self::Llm => "llm",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for TagSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value produced by the tag resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatch {
    /// Primary category names.
    pub primary: Vec<String>,
    /// Secondary category names.
    pub secondary: Vec<String>,
    /// Interest names.
    pub interests: Vec<String>,
    /// Stage that produced the match.
    pub source: TagSource,
    /// Descriptions of the patterns or tokens that matched.
    pub matched: Vec<String>,
}

impl TagMatch {
    fn with_source(source: TagSource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Adds a name on `level` using its canonical spelling.
    ///
    /// Names outside the taxonomy are ignored and duplicates are skipped.
    /// Returns whether the name is known to the taxonomy.
    fn add(&mut self, taxonomy: &Taxonomy, level: TaxonomyLevel, name: &str) -> bool {
        let Some(entry) = taxonomy.lookup(level, name) else {
            return false;
        };
        let list = match level {
            TaxonomyLevel::Primary => &mut self.primary,
            TaxonomyLevel::Secondary => &mut self.secondary,
            TaxonomyLevel::Interest => &mut self.interests,
        };
        if !list.iter().any(|existing| existing == entry.name) {
            list.push(entry.name.to_string());
        }
        true
    }

    /// Whether no names were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty() && self.interests.is_empty()
    }

    /// All names across levels, primaries first.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.primary
            .iter()
            .chain(&self.secondary)
            .chain(&self.interests)
            .map(String::as_str)
    }
}

/// Input shared by every cascade stage.
struct CascadeInput<'a> {
    /// Request plus optional context, as written.
    text: &'a str,
    taxonomy: &'a Taxonomy,
    llm: Option<&'a dyn LlmProvider>,
}

type Stage = fn(&CascadeInput<'_>) -> Option<Extraction<TagMatch>>;

struct CascadeStage {
    source: TagSource,
    threshold: f32,
    run: Stage,
}

const CASCADE: [CascadeStage; 4] = [
    CascadeStage {
        source: TagSource::HighPriority,
        threshold: 0.85,
        run: high_priority_stage,
    },
    CascadeStage {
        source: TagSource::Pattern,
        threshold: 0.7,
        run: general_pattern_stage,
    },
    CascadeStage {
        source: TagSource::Keyword,
        threshold: 0.5,
        run: keyword::keyword_stage,
    },
    CascadeStage {
        source: TagSource::Llm,
        threshold: 0.5,
        run: llm::llm_stage,
    },
];

/// Resolves taxonomy tags from free text.
pub struct TagResolver<'a> {
    taxonomy: &'a Taxonomy,
    llm: Option<&'a dyn LlmProvider>,
}

impl<'a> TagResolver<'a> {
    /// Creates a resolver without a model fallback.
    #[must_use]
    pub const fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            llm: None,
        }
    }

    /// Sets the model used when no pattern or keyword stage is confident.
    #[must_use]
    pub fn with_llm(mut self, llm: Option<&'a dyn LlmProvider>) -> Self {
        self.llm = llm;
        self
    }

    /// Runs the cascade over `text`, with `context` appended when given.
    pub fn resolve(&self, text: &str, context: Option<&str>) -> Extraction<TagMatch> {
        let combined = match context.map(str::trim).filter(|c| !c.is_empty()) {
            Some(context) => format!("{text}\n{context}"),
            None => text.to_string(),
        };
        let input = CascadeInput {
            text: &combined,
            taxonomy: self.taxonomy,
            llm: self.llm,
        };

        for stage in &CASCADE {
            let Some(result) = (stage.run)(&input) else {
                continue;
            };
            if result.confidence >= stage.threshold {
                tracing::debug!(
                    stage = stage.source.as_str(),
                    confidence = result.confidence,
                    tags = result.value.all_tags().count(),
                    "Tag cascade resolved"
                );
                record(stage.source);
                return result;
            }
            tracing::debug!(
                stage = stage.source.as_str(),
                confidence = result.confidence,
                threshold = stage.threshold,
                "Tag stage below threshold"
            );
        }

        record(TagSource::Default);
        Extraction::fallback(
            TagMatch::default(),
            DEFAULT_CONFIDENCE,
            "no category signal; searching all categories",
        )
    }
}

fn record(source: TagSource) {
    metrics::counter!("tag_cascade_stage_total", "stage" => source.as_str()).increment(1);
}

fn high_priority_stage(input: &CascadeInput<'_>) -> Option<Extraction<TagMatch>> {
    pattern_stage(input, &HIGH_PRIORITY_PATTERNS, TagSource::HighPriority)
}

fn general_pattern_stage(input: &CascadeInput<'_>) -> Option<Extraction<TagMatch>> {
    pattern_stage(input, &GENERAL_PATTERNS, TagSource::Pattern)
}

/// Unions the tags of every matching pattern; confidence is the maximum.
fn pattern_stage(
    input: &CascadeInput<'_>,
    patterns: &[TagPattern],
    source: TagSource,
) -> Option<Extraction<TagMatch>> {
    let mut value = TagMatch::with_source(source);
    let mut confidence: f32 = 0.0;

    for p in patterns.iter().filter(|p| p.pattern.is_match(input.text)) {
        let mut known = false;
        for name in p.primary {
            known |= value.add(input.taxonomy, TaxonomyLevel::Primary, name);
        }
        for name in p.secondary {
            known |= value.add(input.taxonomy, TaxonomyLevel::Secondary, name);
        }
        for name in p.interests {
            known |= value.add(input.taxonomy, TaxonomyLevel::Interest, name);
        }
        // A pattern whose names are all unknown to a custom taxonomy adds nothing.
        if known {
            confidence = confidence.max(p.confidence);
            value.matched.push(p.description.to_string());
        }
    }

    if value.is_empty() {
        return None;
    }
    let reasoning = format!("matched {}", value.matched.join(", "));
    Some(Extraction::detected(value, confidence, reasoning))
}
