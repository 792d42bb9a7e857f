//! The per-resolver result envelope.

use serde::{Deserialize, Serialize};

/// Result of running one resolver over free text.
///
/// `detected == false` is an expected outcome, not an error: `value` then holds
/// the resolver's defined default and is never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction<T> {
    /// Whether the resolver found a signal in the text.
    pub detected: bool,
    /// Self-reported certainty in `[0, 1]`.
    pub confidence: f32,
    /// Extracted value, or the resolver default.
    pub value: T,
    /// Short human-readable explanation.
    pub reasoning: String,
}

impl<T> Extraction<T> {
    /// A detected value.
    #[must_use]
    pub fn detected(value: T, confidence: f32, reasoning: impl Into<String>) -> Self {
        Self {
            detected: true,
            confidence: clamp_confidence(confidence),
            value,
            reasoning: reasoning.into(),
        }
    }

    /// Nothing detected; carries the resolver default.
    #[must_use]
    pub fn fallback(default: T, confidence: f32, reasoning: impl Into<String>) -> Self {
        Self {
            detected: false,
            confidence: clamp_confidence(confidence),
            value: default,
            reasoning: reasoning.into(),
        }
    }

    /// Maps the carried value, keeping detection metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extraction<U> {
        Extraction {
            detected: self.detected,
            confidence: self.confidence,
            value: f(self.value),
            reasoning: self.reasoning,
        }
    }
}

impl<T: Default> Extraction<T> {
    /// Nothing detected; carries `T::default()`.
    #[must_use]
    pub fn none(confidence: f32, reasoning: impl Into<String>) -> Self {
        Self::fallback(T::default(), confidence, reasoning)
    }
}

/// Clamps a confidence into `[0, 1]`, mapping NaN to 0.
#[must_use]
pub fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
