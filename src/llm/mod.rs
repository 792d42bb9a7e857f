//! LLM client abstraction.
//!
//! Provides a unified interface for the language-model providers used by the
//! last-resort stage of the tag cascade.

mod anthropic;
mod openai;
mod prompts;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;
pub use prompts::{
    MAX_INTERESTS, MAX_PRIMARY, MAX_SECONDARY, TAG_CLASSIFICATION_PROMPT, build_tag_prompt,
};

use crate::Result;
use crate::taxonomy::Taxonomy;
use serde::Deserialize;

/// Trait for LLM providers.
pub trait LlmProvider: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Generates a completion for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Generates a completion with a system prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    ///
    /// Default implementation concatenates system and user prompts.
    /// Providers should override this to use native system prompt support.
    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        let combined = format!("{system}\n\n---\n\nUser message:\n{user}");
        self.complete(&combined)
    }

    /// Suggests taxonomy names for an event request.
    ///
    /// The returned names are unvalidated model output; callers must check
    /// them against the taxonomy.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails or the response is not valid JSON.
    fn suggest_tags(&self, taxonomy: &Taxonomy, request: &str) -> Result<TagSuggestion> {
        let system = build_tag_prompt(taxonomy);
        let user = format!("Classify this event request:\n\n{request}");
        let response = self.complete_with_system(&system, &user)?;
        parse_tag_suggestion(&response)
    }
}

/// Raw tag suggestion returned by a model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagSuggestion {
    /// Suggested primary categories.
    #[serde(default)]
    pub primary: Vec<String>,
    /// Suggested secondary categories.
    #[serde(default)]
    pub secondary: Vec<String>,
    /// Suggested interests.
    #[serde(default)]
    pub interests: Vec<String>,
    /// Model explanation.
    #[serde(default)]
    pub reasoning: String,
}

/// Parses a tag suggestion from LLM output.
///
/// Handles markdown code fences and surrounding prose.
///
/// # Errors
///
/// Returns an error if no valid JSON object can be extracted.
pub fn parse_tag_suggestion(response: &str) -> Result<TagSuggestion> {
    let json_str = extract_json_from_response(response);
    serde_json::from_str(json_str).map_err(|e| {
        crate::Error::operation(
            "parse_tag_suggestion",
            format!("Invalid JSON: {e}. Response: {response}"),
        )
    })
}

/// Extracts JSON from LLM response, handling markdown code blocks.
fn extract_json_from_response(response: &str) -> &str {
    let trimmed = response.trim();

    // Handle ```json ... ``` blocks
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle ``` ... ``` blocks (without json marker)
    if let Some(start) = trimmed.find("```") {
        let content_start = start + 3;
        let after_marker = &trimmed[content_start..];
        let json_start = after_marker
            .find('{')
            .map_or(content_start, |pos| content_start + pos);
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle raw JSON (find first { to last })
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if end > start {
                return &trimmed[start..=end];
            }
        }
    }

    trimmed
}
