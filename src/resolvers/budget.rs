//! Budget resolver.
//!
//! An explicit price phrase (`under 200`, `less than ₹500`, `budget of 1,000`)
//! wins over keyword classes. Amounts followed by a distance, duration or
//! count unit (`under 5 km`, `max 3 events`) are not prices.

#![allow(clippy::expect_used)]

use super::patterns::parse_amount;
use crate::models::{Budget, Extraction};
use regex::Regex;
use std::sync::LazyLock;

/// Ceiling for generic "cheap" requests.
pub const CHEAP_MAX_PRICE: f64 = 500.0;
/// Ceiling for student-specific requests.
pub const STUDENT_MAX_PRICE: f64 = 300.0;

static EXPLICIT_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:under|less\s+than|below|max(?:imum)?|budget\s+of|up\s*to|cheaper\s+than|not\s+more\s+than)\s+(?:rs\.?|inr|₹|\$)?\s*(\d[\d,]*(?:\.\d+)?)\s*(k)?\b(?:\s*(?:rs|rupees|inr|/-))?(?:\s*(km|kms|kilomet\w*|mi|miles?|mins?|minutes?|hours?|hrs?|people|persons|pax|events?|picks?|results?|options?|days?)\b)?",
    )
    .expect("static regex")
});

static FREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(free|no\s+(?:cover|entry\s+fee|charge)|zero\s+cost|without\s+paying)\b")
        .expect("static regex")
});

static STUDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(students?|college|hostel|pocket\s+money)\b").expect("static regex")
});

static CHEAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(cheap|affordable|inexpensive|low[- ]cost|budget|broke|economical|pocket[- ]friendly|not\s+too\s+expensive)\b",
    )
    .expect("static regex")
});

static PREMIUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(premium|luxury|luxurious|vip|exclusive|upscale|high[- ]end|fancy|splurge)\b")
        .expect("static regex")
});

/// Resolves a price constraint.
pub fn resolve_budget(text: &str) -> Extraction<Budget> {
    if let Some(amount) = explicit_price(text) {
        if amount <= 0.0 {
            return Extraction::detected(Budget::free(), 0.95, "explicit price of zero");
        }
        return Extraction::detected(
            Budget::budget(amount),
            0.95,
            format!("explicit price ceiling {amount}"),
        );
    }

    if let Some(m) = FREE.find(text) {
        return Extraction::detected(
            Budget::free(),
            0.9,
            format!("free indicator '{}'", m.as_str()),
        );
    }

    if let Some(m) = STUDENT.find(text) {
        return Extraction::detected(
            Budget::budget(STUDENT_MAX_PRICE),
            0.8,
            format!("student indicator '{}'", m.as_str()),
        );
    }
    if let Some(m) = CHEAP.find(text) {
        return Extraction::detected(
            Budget::budget(CHEAP_MAX_PRICE),
            0.8,
            format!("budget indicator '{}'", m.as_str()),
        );
    }

    if let Some(m) = PREMIUM.find(text) {
        return Extraction::detected(
            Budget::premium(),
            0.8,
            format!("premium indicator '{}'", m.as_str()),
        );
    }

    Extraction::fallback(Budget::any(), 0.5, "no price preference")
}

/// First price amount that is not followed by a non-price unit.
///
/// The amount must end on a word boundary, so `under 18s` is not a price;
/// a `k` suffix multiplies by a thousand.
fn explicit_price(text: &str) -> Option<f64> {
    EXPLICIT_PRICE
        .captures_iter(text)
        .filter(|caps| caps.get(3).is_none())
        .find_map(|caps| {
            let amount = parse_amount(caps.get(1)?.as_str())?;
            Some(if caps.get(2).is_some() {
                amount * 1000.0
            } else {
                amount
            })
        })
        .filter(|amount| *amount >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetClass;
    use test_case::test_case;

    #[test]
    fn test_under_200() {
        let result = resolve_budget("comedy under 200");
        assert!(result.detected);
        assert_eq!(result.value, Budget::budget(200.0));
        assert!(!result.value.free_only);
    }

    #[test]
    fn test_free_events() {
        let result = resolve_budget("free events");
        assert_eq!(result.value.class, BudgetClass::Free);
        assert_eq!(result.value.max_price, Some(0.0));
        assert!(result.value.free_only);
    }

    #[test_case("less than ₹1,500 please", 1500.0 ; "rupee symbol and comma")]
    #[test_case("budget of rs. 750", 750.0 ; "rs prefix")]
    #[test_case("max 999/- entry", 999.0 ; "slash dash suffix")]
    #[test_case("below 300 rupees", 300.0 ; "rupees suffix")]
    #[test_case("live concerts under 5k this weekend", 5000.0 ; "thousands shorthand")]
    #[test_case("budget of 1.5K", 1500.0 ; "fractional thousands")]
    fn test_explicit_prices(text: &str, expected: f64) {
        let result = resolve_budget(text);
        assert_eq!(result.value.max_price, Some(expected));
        assert_eq!(result.value.class, BudgetClass::Budget);
    }

    #[test]
    fn test_zero_price_is_free() {
        assert_eq!(resolve_budget("under 0").value, Budget::free());
    }

    #[test_case("within under 5 km" ; "distance")]
    #[test_case("max 3 events" ; "count")]
    #[test_case("less than 2 hours" ; "duration")]
    #[test_case("parties for under 18s" ; "age group")]
    #[test_case("under 5km from home" ; "glued distance unit")]
    fn test_non_price_amounts_ignored(text: &str) {
        let result = resolve_budget(text);
        assert!(!result.detected);
        assert_eq!(result.value, Budget::any());
    }

    #[test]
    fn test_explicit_price_beats_keywords() {
        let result = resolve_budget("cheap stuff under 250");
        assert_eq!(result.value.max_price, Some(250.0));
    }

    #[test]
    fn test_keyword_classes() {
        assert_eq!(
            resolve_budget("affordable brunch").value,
            Budget::budget(CHEAP_MAX_PRICE)
        );
        assert_eq!(
            resolve_budget("something for students, we're broke").value,
            Budget::budget(STUDENT_MAX_PRICE)
        );
        assert_eq!(resolve_budget("a luxury wine evening").value, Budget::premium());
    }

    #[test]
    fn test_no_preference() {
        let result = resolve_budget("jazz in goa");
        assert!(!result.detected);
        assert_eq!(result.value, Budget::any());
        assert!(!result.value.free_only);
    }
}
