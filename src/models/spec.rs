//! The structured search specification.

use super::Coordinates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Smallest result count a spec may request.
pub const MIN_LIMIT: usize = 1;
/// Largest result count a spec may request.
pub const MAX_LIMIT: usize = 20;
/// City-wide radius used when nothing more specific is known.
pub const DEFAULT_RADIUS_KM: f64 = 20.0;

/// Serialization format for single dates (`DD/MM/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// How a time filter was expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    /// A named day understood by the catalog (`today`, `tomorrow`).
    Keyword,
    /// A single calendar date.
    Date,
    /// An inclusive date range.
    Range,
}

impl TimeMode {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Date => "date",
            Self::Range => "range",
        }
    }
}

/// A resolved time window.
///
/// `start` and `end` are inclusive and always populated, whatever the mode,
/// so consumers can filter without re-parsing `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFilter {
    /// How the window was expressed.
    pub mode: TimeMode,
    /// Serialized value: keyword, `DD/MM/YYYY`, or `DD/MM/YYYY - DD/MM/YYYY`.
    pub value: String,
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

impl TimeFilter {
    /// A keyword window covering a single day.
    #[must_use]
    pub fn keyword(keyword: &str, day: NaiveDate) -> Self {
        Self {
            mode: TimeMode::Keyword,
            value: keyword.to_string(),
            start: day,
            end: day,
        }
    }

    /// A single date.
    #[must_use]
    pub fn date(day: NaiveDate) -> Self {
        Self {
            mode: TimeMode::Date,
            value: day.format(DATE_FORMAT).to_string(),
            start: day,
            end: day,
        }
    }

    /// An inclusive range; the endpoints are ordered if given reversed.
    #[must_use]
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        Self {
            mode: TimeMode::Range,
            value: format!(
                "{} - {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
            start,
            end,
        }
    }
}

/// Price class requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BudgetClass {
    /// Free events only.
    Free,
    /// Low-cost events.
    Budget,
    /// High-end events.
    Premium,
    /// No price preference.
    #[default]
    Any,
}

impl BudgetClass {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Budget => "budget",
            Self::Premium => "premium",
            Self::Any => "any",
        }
    }
}

impl std::fmt::Display for BudgetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Price constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Budget {
    /// Price class.
    pub class: BudgetClass,
    /// Inclusive price ceiling, if any.
    pub max_price: Option<f64>,
    /// Only free events are acceptable.
    pub free_only: bool,
}

impl Budget {
    /// Free events only.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            class: BudgetClass::Free,
            max_price: Some(0.0),
            free_only: true,
        }
    }

    /// Low-cost events under `max_price`.
    #[must_use]
    pub const fn budget(max_price: f64) -> Self {
        Self {
            class: BudgetClass::Budget,
            max_price: Some(max_price),
            free_only: false,
        }
    }

    /// High-end events, no ceiling.
    #[must_use]
    pub const fn premium() -> Self {
        Self {
            class: BudgetClass::Premium,
            max_price: None,
            free_only: false,
        }
    }

    /// No price preference.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            class: BudgetClass::Any,
            max_price: None,
            free_only: false,
        }
    }

    /// Returns whether a price satisfies this constraint.
    ///
    /// Events with an unknown price are accepted.
    #[must_use]
    pub fn accepts(&self, price: Option<f64>) -> bool {
        let Some(price) = price else {
            return true;
        };
        if self.free_only {
            return price <= 0.0;
        }
        self.max_price.is_none_or(|ceiling| price <= ceiling)
    }

    /// Returns whether this constraint filters anything.
    #[must_use]
    pub const fn is_constraining(&self) -> bool {
        self.free_only || self.max_price.is_some()
    }
}

/// Remote sort order for catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Nearest first.
    #[default]
    Distance,
    /// Soonest first.
    Date,
}

impl SortMode {
    /// Returns the string representation used in catalog queries.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Date => "date",
        }
    }
}

/// Structured search specification.
///
/// Built fresh per query through [`SearchSpecBuilder`] and immutable afterwards.
/// The builder enforces `radius_km > 0` and `limit ∈ [1, 20]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSpec {
    coordinates: Option<Coordinates>,
    location_name: Option<String>,
    tags: BTreeSet<String>,
    radius_km: f64,
    time: Option<TimeFilter>,
    budget: Budget,
    limit: usize,
    sort: SortMode,
}

impl SearchSpec {
    /// Starts building a spec.
    #[must_use]
    pub fn builder() -> SearchSpecBuilder {
        SearchSpecBuilder::default()
    }

    /// Search centre, if resolved.
    #[must_use]
    pub const fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    /// Display name of the resolved location.
    #[must_use]
    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    /// Taxonomy tags; empty means all categories.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Search radius in kilometres (always positive).
    #[must_use]
    pub const fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Time window, if any.
    #[must_use]
    pub const fn time(&self) -> Option<&TimeFilter> {
        self.time.as_ref()
    }

    /// Price constraint.
    #[must_use]
    pub const fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Requested result count in `[1, 20]`.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Remote sort order.
    #[must_use]
    pub const fn sort(&self) -> SortMode {
        self.sort
    }
}

/// Builder for [`SearchSpec`].
#[derive(Debug, Clone, Default)]
pub struct SearchSpecBuilder {
    coordinates: Option<Coordinates>,
    location_name: Option<String>,
    tags: BTreeSet<String>,
    radius_km: Option<f64>,
    time: Option<TimeFilter>,
    budget: Budget,
    limit: Option<usize>,
    sort: Option<SortMode>,
}

impl SearchSpecBuilder {
    /// Sets the search centre.
    #[must_use]
    pub const fn coordinates(mut self, coordinates: Option<Coordinates>) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// Sets the location display name.
    #[must_use]
    pub fn location_name(mut self, name: Option<String>) -> Self {
        self.location_name = name;
        self
    }

    /// Adds tags; blank strings are ignored.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(
            tags.into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.trim().is_empty()),
        );
        self
    }

    /// Sets the radius.
    #[must_use]
    pub const fn radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    /// Sets the time window.
    #[must_use]
    pub fn time(mut self, time: Option<TimeFilter>) -> Self {
        self.time = time;
        self
    }

    /// Sets the price constraint.
    #[must_use]
    pub const fn budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the result count (clamped on build).
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Overrides the derived sort order.
    #[must_use]
    pub const fn sort(mut self, sort: SortMode) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Builds the spec.
    ///
    /// A missing, non-finite or non-positive radius becomes
    /// [`DEFAULT_RADIUS_KM`]. The sort order defaults to date when a time window
    /// is present and distance otherwise.
    #[must_use]
    pub fn build(self) -> SearchSpec {
        let radius_km = self
            .radius_km
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(DEFAULT_RADIUS_KM);
        let limit = self.limit.unwrap_or(3).clamp(MIN_LIMIT, MAX_LIMIT);
        let sort = self.sort.unwrap_or(if self.time.is_some() {
            SortMode::Date
        } else {
            SortMode::Distance
        });

        SearchSpec {
            coordinates: self.coordinates.filter(Coordinates::is_valid),
            location_name: self.location_name,
            tags: self.tags,
            radius_km,
            time: self.time,
            budget: self.budget,
            limit,
            sort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_time_filter_serialization() {
        assert_eq!(TimeFilter::date(day(2026, 3, 7)).value, "07/03/2026");
        assert_eq!(
            TimeFilter::range(day(2026, 3, 7), day(2026, 3, 8)).value,
            "07/03/2026 - 08/03/2026"
        );
        let today = TimeFilter::keyword("today", day(2026, 3, 7));
        assert_eq!(today.mode, TimeMode::Keyword);
        assert_eq!(today.start, today.end);
    }

    #[test]
    fn test_range_orders_endpoints() {
        let range = TimeFilter::range(day(2026, 3, 9), day(2026, 3, 7));
        assert_eq!(range.start, day(2026, 3, 7));
        assert_eq!(range.end, day(2026, 3, 9));
    }

    #[test]
    fn test_budget_accepts() {
        assert!(Budget::free().accepts(Some(0.0)));
        assert!(!Budget::free().accepts(Some(100.0)));
        assert!(Budget::budget(500.0).accepts(Some(500.0)));
        assert!(!Budget::budget(500.0).accepts(Some(501.0)));
        assert!(Budget::premium().accepts(Some(10_000.0)));
        assert!(Budget::budget(200.0).accepts(None));
        assert!(!Budget::any().is_constraining());
    }

    #[test]
    fn test_builder_enforces_bounds() {
        let spec = SearchSpec::builder().radius_km(-3.0).limit(0).build();
        assert!((spec.radius_km() - DEFAULT_RADIUS_KM).abs() < f64::EPSILON);
        assert_eq!(spec.limit(), MIN_LIMIT);

        let spec = SearchSpec::builder()
            .radius_km(f64::NAN)
            .limit(500)
            .build();
        assert!((spec.radius_km() - DEFAULT_RADIUS_KM).abs() < f64::EPSILON);
        assert_eq!(spec.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_builder_derives_sort() {
        let spec = SearchSpec::builder().build();
        assert_eq!(spec.sort(), SortMode::Distance);

        let spec = SearchSpec::builder()
            .time(Some(TimeFilter::date(day(2026, 1, 1))))
            .build();
        assert_eq!(spec.sort(), SortMode::Date);
    }

    #[test]
    fn test_builder_drops_blank_tags_and_dedupes() {
        let spec = SearchSpec::builder()
            .tags(["Music", " ", "Music", "Jazz"])
            .build();
        assert_eq!(spec.tags().len(), 2);
    }
}
