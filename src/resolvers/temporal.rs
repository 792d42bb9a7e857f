//! Temporal resolver.
//!
//! Keywords are checked before absolute dates, most specific first:
//!
//! | Phrase | Mode | Window |
//! |--------|------|--------|
//! | next weekend | range | the weekend after the one "this weekend" names |
//! | next week | range | following Monday to Sunday |
//! | (this) weekend | range | upcoming Saturday and Sunday |
//! | this week | range | today to the coming Sunday |
//! | this month | range | today to the last day of the month |
//! | tomorrow | keyword | tomorrow |
//! | today, tonight | keyword | today |
//!
//! Absolute dates accept `March 7`, `7th March 2026` and `07/03/2026`
//! (day first). A missing year means the current year. Two dates in one
//! request form a range.

#![allow(clippy::expect_used)]

use crate::models::{Extraction, TimeFilter};
use chrono::{Datelike, Days, Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

const KEYWORD_CONFIDENCE: f32 = 0.9;
const DATE_CONFIDENCE: f32 = 0.85;

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

#[derive(Debug, Clone, Copy)]
enum Keyword {
    NextWeekend,
    NextWeek,
    Weekend,
    ThisWeek,
    ThisMonth,
    Tomorrow,
    Today,
}

/// Ordered so that longer phrases shadow their substrings.
static KEYWORDS: LazyLock<Vec<(Regex, Keyword)>> = LazyLock::new(|| {
    [
        (r"\bnext\s+weekend\b", Keyword::NextWeekend),
        (r"\bnext\s+week\b", Keyword::NextWeek),
        (r"\b(?:this\s+)?weekend\b", Keyword::Weekend),
        (r"\bthis\s+week\b", Keyword::ThisWeek),
        (r"\bthis\s+month\b", Keyword::ThisMonth),
        (r"\btomorrow\b", Keyword::Tomorrow),
        (r"\b(?:today|tonight)\b", Keyword::Today),
    ]
    .into_iter()
    .map(|(pattern, keyword)| {
        (
            Regex::new(&format!("(?i){pattern}")).expect("static regex"),
            keyword,
        )
    })
    .collect()
});

/// `March 7`, `Mar 7th, 2026`
static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(\d{{4}}))?"
    ))
    .expect("static regex")
});

/// `7 March`, `7th of March 2026`
static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTHS})\b\.?(?:,?\s+(\d{{4}}))?"
    ))
    .expect("static regex")
});

/// `07/03/2026`, `7-3-2026`
static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").expect("static regex")
});

/// Resolves a time window relative to the local date.
pub fn resolve_time(text: &str) -> Extraction<Option<TimeFilter>> {
    resolve_time_at(text, Local::now().date_naive())
}

/// Resolves a time window relative to `today`.
///
/// Pure: identical input yields an identical result.
pub fn resolve_time_at(text: &str, today: NaiveDate) -> Extraction<Option<TimeFilter>> {
    for (pattern, keyword) in KEYWORDS.iter() {
        let Some(m) = pattern.find(text) else {
            continue;
        };
        if let Some(filter) = keyword_window(*keyword, today) {
            let reasoning = format!("keyword '{}'", m.as_str().to_lowercase());
            return Extraction::detected(Some(filter), KEYWORD_CONFIDENCE, reasoning);
        }
    }

    let mut dates = absolute_dates(text, today.year());
    dates.sort_unstable();
    dates.dedup();

    match dates.as_slice() {
        [] => Extraction::none(0.0, "no time reference"),
        [day] => Extraction::detected(
            Some(TimeFilter::date(*day)),
            DATE_CONFIDENCE,
            format!("date {}", day.format("%Y-%m-%d")),
        ),
        [first, .., last] => Extraction::detected(
            Some(TimeFilter::range(*first, *last)),
            DATE_CONFIDENCE,
            format!("{} dates form a range", dates.len()),
        ),
    }
}

fn keyword_window(keyword: Keyword, today: NaiveDate) -> Option<TimeFilter> {
    let from_monday = u64::from(today.weekday().num_days_from_monday());
    // Saturday is 5 days from Monday; on Sunday this wraps to next Saturday.
    let upcoming_saturday = today.checked_add_days(Days::new((5 + 7 - from_monday) % 7))?;
    let filter = match keyword {
        Keyword::Today => TimeFilter::keyword("today", today),
        Keyword::Tomorrow => TimeFilter::keyword("tomorrow", today.checked_add_days(Days::new(1))?),
        Keyword::Weekend => TimeFilter::range(
            upcoming_saturday,
            upcoming_saturday.checked_add_days(Days::new(1))?,
        ),
        Keyword::NextWeek => {
            let monday = today.checked_add_days(Days::new(7 - from_monday))?;
            TimeFilter::range(monday, monday.checked_add_days(Days::new(6))?)
        },
        Keyword::NextWeekend => {
            let saturday = upcoming_saturday.checked_add_days(Days::new(7))?;
            TimeFilter::range(saturday, saturday.checked_add_days(Days::new(1))?)
        },
        Keyword::ThisWeek => {
            TimeFilter::range(today, today.checked_add_days(Days::new(6 - from_monday))?)
        },
        Keyword::ThisMonth => TimeFilter::range(today, last_day_of_month(today)?),
    };
    Some(filter)
}

fn last_day_of_month(day: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)?.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Every valid date in `text`. Invalid dates are skipped.
fn absolute_dates(text: &str, current_year: i32) -> Vec<NaiveDate> {
    let year_or_current = |m: Option<regex::Match<'_>>| {
        m.and_then(|y| y.as_str().parse::<i32>().ok())
            .unwrap_or(current_year)
    };

    let mut found = Vec::new();
    for caps in MONTH_DAY.captures_iter(text) {
        let parsed = caps
            .get(1)
            .and_then(|m| month_number(m.as_str()))
            .zip(caps.get(2).and_then(|d| d.as_str().parse::<u32>().ok()))
            .and_then(|(month, day)| {
                NaiveDate::from_ymd_opt(year_or_current(caps.get(3)), month, day)
            });
        found.extend(parsed);
    }
    for caps in DAY_MONTH.captures_iter(text) {
        let parsed = caps
            .get(2)
            .and_then(|m| month_number(m.as_str()))
            .zip(caps.get(1).and_then(|d| d.as_str().parse::<u32>().ok()))
            .and_then(|(month, day)| {
                NaiveDate::from_ymd_opt(year_or_current(caps.get(3)), month, day)
            });
        found.extend(parsed);
    }
    for caps in NUMERIC_DATE.captures_iter(text) {
        let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let parsed = match (part(1), part(2), caps.get(3)) {
            (Some(day), Some(month), year) => {
                NaiveDate::from_ymd_opt(year_or_current(year), month, day)
            },
            _ => None,
        };
        found.extend(parsed);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeMode;
    use chrono::Weekday;
    use test_case::test_case;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(text: &str, today: NaiveDate) -> TimeFilter {
        resolve_time_at(text, today).value.unwrap()
    }

    #[test]
    fn test_weekend_from_wednesday() {
        let wednesday = day(2026, 3, 4);
        assert_eq!(wednesday.weekday(), Weekday::Wed);
        let filter = window("this weekend", wednesday);
        assert_eq!(filter.start, day(2026, 3, 7));
        assert_eq!(filter.end, day(2026, 3, 8));
        assert_eq!(filter.mode, TimeMode::Range);
        assert_eq!(filter.value, "07/03/2026 - 08/03/2026");
    }

    #[test_case(day(2026, 3, 7), day(2026, 3, 7) ; "saturday is today")]
    #[test_case(day(2026, 3, 8), day(2026, 3, 14) ; "sunday wraps to next saturday")]
    #[test_case(day(2026, 3, 2), day(2026, 3, 7) ; "monday")]
    fn test_weekend_wraparound(today: NaiveDate, saturday: NaiveDate) {
        let filter = window("weekend plans", today);
        assert_eq!(filter.start, saturday);
        assert_eq!(filter.start.weekday(), Weekday::Sat);
        assert_eq!(filter.end.weekday(), Weekday::Sun);
    }

    #[test_case(day(2026, 3, 4), day(2026, 3, 14) ; "wednesday")]
    #[test_case(day(2026, 3, 7), day(2026, 3, 14) ; "saturday")]
    #[test_case(day(2026, 3, 8), day(2026, 3, 21) ; "sunday skips the coming weekend")]
    fn test_next_weekend_follows_this_weekend(today: NaiveDate, saturday: NaiveDate) {
        let this_weekend = window("this weekend", today);
        let next_weekend = window("next weekend", today);
        assert_eq!(next_weekend.start, saturday);
        assert_eq!(next_weekend.start, this_weekend.start + chrono::Duration::days(7));
        assert_eq!(next_weekend.end.weekday(), Weekday::Sun);
    }

    #[test]
    fn test_keywords() {
        let wednesday = day(2026, 3, 4);
        let tonight = window("gigs tonight", wednesday);
        assert_eq!(tonight.mode, TimeMode::Keyword);
        assert_eq!(tonight.value, "today");
        assert_eq!(tonight.start, wednesday);

        let tomorrow = window("Tomorrow?", wednesday);
        assert_eq!(tomorrow.start, day(2026, 3, 5));

        let next_week = window("next week", wednesday);
        assert_eq!((next_week.start, next_week.end), (day(2026, 3, 9), day(2026, 3, 15)));

        let next_weekend = window("next weekend", wednesday);
        assert_eq!(
            (next_weekend.start, next_weekend.end),
            (day(2026, 3, 14), day(2026, 3, 15))
        );

        let this_week = window("this week", wednesday);
        assert_eq!((this_week.start, this_week.end), (wednesday, day(2026, 3, 8)));
    }

    #[test]
    fn test_this_month_handles_december() {
        let filter = window("this month", day(2026, 12, 10));
        assert_eq!(filter.end, day(2026, 12, 31));
        let filter = window("this month", day(2028, 2, 3));
        assert_eq!(filter.end, day(2028, 2, 29));
    }

    #[test_case("on March 7", day(2026, 3, 7) ; "month day")]
    #[test_case("7th of march", day(2026, 3, 7) ; "day month ordinal")]
    #[test_case("Dec 31, 2027", day(2027, 12, 31) ; "explicit year")]
    #[test_case("on 05/04/2026", day(2026, 4, 5) ; "numeric day first")]
    fn test_absolute_dates(text: &str, expected: NaiveDate) {
        let result = resolve_time_at(text, day(2026, 1, 15));
        let filter = result.value.unwrap();
        assert_eq!(filter.mode, TimeMode::Date);
        assert_eq!(filter.start, expected);
        assert!((result.confidence - DATE_CONFIDENCE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_two_dates_form_range() {
        let filter = window("from 22 Dec to 20 Dec", day(2026, 1, 1));
        assert_eq!(filter.mode, TimeMode::Range);
        assert_eq!(filter.start, day(2026, 12, 20));
        assert_eq!(filter.end, day(2026, 12, 22));
    }

    #[test]
    fn test_invalid_dates_are_skipped() {
        let result = resolve_time_at("on 31/02/2026", day(2026, 1, 1));
        assert!(!result.detected);
        assert!(result.value.is_none());
    }

    #[test]
    fn test_no_match() {
        let result = resolve_time_at("jazz in goa", day(2026, 1, 1));
        assert!(!result.detected);
        assert!(result.value.is_none());
    }

    #[test]
    fn test_idempotent() {
        let today = day(2026, 6, 10);
        assert_eq!(
            resolve_time_at("free gigs this weekend", today),
            resolve_time_at("free gigs this weekend", today)
        );
    }
}
