//! Prompt text for model-based tag classification.

use crate::taxonomy::Taxonomy;

/// Most primary categories a model may return.
pub const MAX_PRIMARY: usize = 3;
/// Most secondary categories a model may return.
pub const MAX_SECONDARY: usize = 4;
/// Most interests a model may return.
pub const MAX_INTERESTS: usize = 5;

/// System prompt header for tag classification.
pub const TAG_CLASSIFICATION_PROMPT: &str = "You classify requests for local events \
into a fixed event taxonomy. Use ONLY names that appear verbatim in the taxonomy \
below. Never invent categories. If nothing fits, return empty arrays.";

/// Builds the full system prompt, embedding the taxonomy outline.
#[must_use]
pub fn build_tag_prompt(taxonomy: &Taxonomy) -> String {
    format!(
        "{TAG_CLASSIFICATION_PROMPT}\n\n\
         <taxonomy>\n{outline}</taxonomy>\n\n\
         Respond only with JSON in this shape:\n\
         {{\"primary\": [..], \"secondary\": [..], \"interests\": [..], \"reasoning\": \"..\"}}\n\
         Return at most {MAX_PRIMARY} primary, {MAX_SECONDARY} secondary and \
         {MAX_INTERESTS} interest names.",
        outline = taxonomy.outline()
    )
}
