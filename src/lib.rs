mod consts;
mod entity;
mod iso;
mod markup;
mod prelude;
mod text;
mod types;

pub use consts::*;
pub use entity::{
    AchievementProgress, AuthorLabels, EntityType, max_achievement_progress,
};
pub use iso::{DateClass, FormatError, IsoDate, classify, try_format};
pub use markup::{MarkupPolicy, SafeMarkup, linkify_and_sanitize};
pub use text::{count_words, format_timestamp, inject_default_alias_name, today};
pub use types::{Day, Month, Year, days_in_month, is_leap_year};

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// A partial calendar date as it travels through entity forms.
///
/// Each component is kept exactly as entered; `None` and `Some("")` both
/// mean "not provided". The year may carry a sign, negative years are
/// before the common era.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DateParts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

/// Anything a date field can hold before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput<'a> {
    /// An extended ISO string such as `+001999-05-12` or `-000044`
    StringDate(&'a str),
    /// An already structured date, passed through untouched
    StructuredDate(Cow<'a, DateParts>),
    /// A value that is neither; normalizes to the empty date
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(
        fmt = "Invalid year: {} (expected a signed integer of at most {} digits)",
        "_0",
        YEAR_WIDTH
    )]
    InvalidYear(String),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {month} of year {year}")]
    InvalidDay { year: i32, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
    #[display(fmt = "Unknown entity type: {_0}")]
    UnknownEntityType(String),
}

impl std::error::Error for ParseError {}

impl DateParts {
    /// Builds a date from raw form values; empty strings become `None`
    pub fn new(
        year: impl Into<String>,
        month: impl Into<String>,
        day: impl Into<String>,
    ) -> Self {
        Self {
            year: non_empty(year.into()),
            month: non_empty(month.into()),
            day: non_empty(day.into()),
        }
    }

    /// Year-only date
    pub fn from_year(year: impl Into<String>) -> Self {
        Self::new(year, String::new(), String::new())
    }

    /// Returns the year if provided
    pub fn year(&self) -> Option<&str> {
        provided(self.year.as_deref())
    }

    /// Returns the month if provided
    pub fn month(&self) -> Option<&str> {
        provided(self.month.as_deref())
    }

    /// Returns the day if provided
    pub fn day(&self) -> Option<&str> {
        provided(self.day.as_deref())
    }

    /// True when no year, month or day has been provided
    pub fn is_null(&self) -> bool {
        self.year().is_none() && self.month().is_none() && self.day().is_none()
    }

    /// The year as a signed integer, if it is one.
    ///
    /// Surrounding whitespace and a leading `+` are accepted.
    pub fn numeric_year(&self) -> Option<i64> {
        self.year()?.trim().parse().ok()
    }

    /// Formats this date in the extended ISO form, see [`format_iso_from_date_parts`]
    pub fn to_iso_string(&self) -> Option<String> {
        format_iso_from_date_parts(Some(self))
    }

    /// Splits an extended ISO string into its components
    fn from_iso_segments(value: &str) -> Self {
        if value.is_empty() {
            return Self::default();
        }

        let mut segments = value.split(DATE_SEPARATOR);
        let mut year = segments.next().map(str::to_owned);
        // A leading BCE sign leaves an empty first segment; the sign belongs
        // to the segment after it
        if year.as_deref() == Some("") {
            year = segments.next().map(negate_segment);
        }

        Self {
            year: year.and_then(non_empty),
            month: segments.next().and_then(|m| non_empty(m.to_owned())),
            day: segments.next().and_then(|d| non_empty(d.to_owned())),
        }
    }
}

impl<'a> DateInput<'a> {
    /// Classifies a loosely typed JSON value the way form state arrives
    /// from the browser: strings are ISO dates, objects with a `year` key
    /// are structured dates and everything else is unrecognized.
    pub fn from_json(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Self::StringDate(s),
            Value::Object(map) if map.contains_key("year") => {
                let component = |key: &str| match map.get(key) {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    _ => None,
                };
                Self::StructuredDate(Cow::Owned(DateParts {
                    year: component("year"),
                    month: component("month"),
                    day: component("day"),
                }))
            }
            _ => Self::Unrecognized,
        }
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::StringDate(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::StringDate(value)
    }
}

impl<'a> From<&'a DateParts> for DateInput<'a> {
    fn from(value: &'a DateParts) -> Self {
        Self::StructuredDate(Cow::Borrowed(value))
    }
}

impl From<DateParts> for DateInput<'_> {
    fn from(value: DateParts) -> Self {
        Self::StructuredDate(Cow::Owned(value))
    }
}

impl<'a> From<&'a Value> for DateInput<'a> {
    fn from(value: &'a Value) -> Self {
        Self::from_json(value)
    }
}

impl<'a, T> From<Option<T>> for DateInput<'a>
where
    T: Into<DateInput<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unrecognized, Into::into)
    }
}

/// Normalizes a date field into its components.
///
/// Structured input is returned unchanged, so the function is idempotent.
/// Strings are split on `-`; a leading `-` marks a BCE year, which comes
/// back as a negative integer (`"-000044"` gives year `"-44"`). Components
/// missing from the string are `None`. Never fails.
pub fn parse_iso_date<'a>(input: impl Into<DateInput<'a>>) -> DateParts {
    match input.into() {
        DateInput::StringDate(value) => DateParts::from_iso_segments(value),
        DateInput::StructuredDate(parts) => parts.into_owned(),
        DateInput::Unrecognized => DateParts::default(),
    }
}

/// True when the date, in either form, carries no year, month or day.
pub fn is_null_date<'a>(input: impl Into<DateInput<'a>>) -> bool {
    match input.into() {
        DateInput::StringDate(value) => DateParts::from_iso_segments(value).is_null(),
        DateInput::StructuredDate(parts) => parts.is_null(),
        DateInput::Unrecognized => true,
    }
}

/// Formats a date as `(+|-)YYYYYY[-MM[-DD]]`, or `(+|-)YYYYYY-XX-DD` when
/// the day is known but the month is not.
///
/// Returns `None` for a missing or null date and [`INVALID_YEAR_SENTINEL`]
/// when the year is missing or not an integer. Month and day are written
/// as given. The output is persisted, so the padding, sign and placeholder
/// conventions must not change.
pub fn format_iso_from_date_parts(value: Option<&DateParts>) -> Option<String> {
    let value = value?;
    if value.is_null() {
        return None;
    }

    let Some(numeric_year) = value.numeric_year() else {
        tracing::debug!(
            year = ?value.year,
            "date has no integer year, writing invalid-year sentinel"
        );
        return Some(INVALID_YEAR_SENTINEL.to_owned());
    };

    let mut date = format_signed_year(numeric_year);
    match (value.month(), value.day()) {
        (Some(month), day) => {
            date.push(DATE_SEPARATOR);
            date.push_str(month);
            if let Some(day) = day {
                date.push(DATE_SEPARATOR);
                date.push_str(day);
            }
        }
        (None, Some(day)) => {
            date.push(DATE_SEPARATOR);
            date.push_str(UNKNOWN_MONTH_PLACEHOLDER);
            date.push(DATE_SEPARATOR);
            date.push_str(day);
        }
        (None, None) => {}
    }
    Some(date)
}

fn format_signed_year(year: i64) -> String {
    let sign = if year < 0 { BCE_SIGN } else { CE_SIGN };
    format!("{sign}{:0width$}", year.unsigned_abs(), width = YEAR_WIDTH)
}

/// Re-applies the BCE sign to the segment after a leading `-`.
/// Non-numeric segments keep the sign textually so they still read as an
/// invalid year rather than a missing one.
fn negate_segment(segment: &str) -> String {
    match segment.trim().parse::<i64>().ok().and_then(i64::checked_neg) {
        Some(negated) => negated.to_string(),
        None => format!("{BCE_SIGN}{segment}"),
    }
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parts(year: &str, month: &str, day: &str) -> DateParts {
        DateParts::new(year, month, day)
    }

    #[test]
    fn test_format_full_date() {
        assert_eq!(
            format_iso_from_date_parts(Some(&parts("1999", "05", "12"))),
            Some("+001999-05-12".to_owned())
        );
    }

    #[test]
    fn test_format_bce_year_only() {
        assert_eq!(
            format_iso_from_date_parts(Some(&parts("-44", "", ""))),
            Some("-000044".to_owned())
        );
    }

    #[test]
    fn test_format_day_without_month_uses_placeholder() {
        assert_eq!(
            format_iso_from_date_parts(Some(&parts("2000", "", "15"))),
            Some("+002000-XX-15".to_owned())
        );
    }

    #[test]
    fn test_format_month_without_day_omits_day() {
        assert_eq!(
            parts("2000", "07", "").to_iso_string(),
            Some("+002000-07".to_owned())
        );
    }

    #[test]
    fn test_format_null_date() {
        assert_eq!(format_iso_from_date_parts(Some(&parts("", "", ""))), None);
        assert_eq!(format_iso_from_date_parts(Some(&DateParts::default())), None);
        assert_eq!(format_iso_from_date_parts(None), None);
    }

    #[test]
    fn test_format_invalid_year_sentinel() {
        let date = DateParts {
            year: Some("abc".to_owned()),
            ..DateParts::default()
        };
        assert_eq!(date.to_iso_string(), Some(INVALID_YEAR_SENTINEL.to_owned()));

        // A month or day without any year is invalid, not null
        assert_eq!(
            parts("", "05", "").to_iso_string(),
            Some("+XXXXXX".to_owned())
        );
        assert_eq!(
            parts("12.5", "", "").to_iso_string(),
            Some("+XXXXXX".to_owned())
        );
    }

    #[test]
    fn test_format_month_and_day_are_not_repadded() {
        assert_eq!(
            parts("1999", "5", "3").to_iso_string(),
            Some("+001999-5-3".to_owned())
        );
    }

    #[test]
    fn test_format_year_zero_and_wide_years() {
        assert_eq!(parts("0", "", "").to_iso_string(), Some("+000000".to_owned()));
        assert_eq!(parts("-0", "", "").to_iso_string(), Some("+000000".to_owned()));
        assert_eq!(
            parts("1234567", "", "").to_iso_string(),
            Some("+1234567".to_owned())
        );
    }

    #[test]
    fn test_format_accepts_signed_and_padded_years() {
        assert_eq!(
            parts("+001999", "01", "").to_iso_string(),
            Some("+001999-01".to_owned())
        );
        assert_eq!(parts(" 44 ", "", "").to_iso_string(), Some("+000044".to_owned()));
    }

    #[test]
    fn test_parse_bce_year() {
        assert_eq!(
            parse_iso_date("-000044"),
            DateParts {
                year: Some("-44".to_owned()),
                month: None,
                day: None,
            }
        );
    }

    #[test]
    fn test_parse_full_date() {
        let date = parse_iso_date("+001999-05-12");
        assert_eq!(date.year(), Some("+001999"));
        assert_eq!(date.month(), Some("05"));
        assert_eq!(date.day(), Some("12"));
    }

    #[test]
    fn test_parse_bce_full_date() {
        let date = parse_iso_date("-000500-03-15");
        assert_eq!(date, parts("-500", "03", "15"));
    }

    #[test]
    fn test_parse_placeholder_month() {
        let date = parse_iso_date("+002000-XX-15");
        assert_eq!(date.month(), Some("XX"));
        assert_eq!(date.day(), Some("15"));
    }

    #[test]
    fn test_parse_empty_string() {
        assert_eq!(parse_iso_date(""), DateParts::default());
    }

    #[test]
    fn test_parse_lone_sign_is_invalid_not_null() {
        let date = parse_iso_date("-");
        assert_eq!(date.year(), Some("-"));
        assert_eq!(date.to_iso_string(), Some(INVALID_YEAR_SENTINEL.to_owned()));

        let date = parse_iso_date("-abc");
        assert_eq!(date.year(), Some("-abc"));
    }

    #[test]
    fn test_parse_ignores_extra_segments() {
        let date = parse_iso_date("+001999-05-12-99");
        assert_eq!(date, parts("+001999", "05", "12"));
    }

    #[test]
    fn test_parse_structured_passes_through() {
        let date = DateParts {
            year: Some("1999".to_owned()),
            month: Some(String::new()),
            day: None,
        };
        assert_eq!(parse_iso_date(&date), date);
        assert_eq!(parse_iso_date(date.clone()), date);
    }

    #[test]
    fn test_parse_is_idempotent() {
        for input in ["-000044", "+001999-05-12", "", "+002000-XX-15", "junk"] {
            let once = parse_iso_date(input);
            let twice = parse_iso_date(&once);
            assert_eq!(once, twice, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_unrecognized() {
        assert_eq!(parse_iso_date(DateInput::Unrecognized), DateParts::default());
        assert_eq!(parse_iso_date(None::<&str>), DateParts::default());
    }

    #[test]
    fn test_from_json_dispatch() {
        let value = json!("+001999-05");
        assert_eq!(DateInput::from_json(&value), DateInput::StringDate("+001999-05"));

        let value = json!({"year": 1999, "month": "05", "day": ""});
        assert_eq!(
            parse_iso_date(&value),
            DateParts {
                year: Some("1999".to_owned()),
                month: Some("05".to_owned()),
                day: Some(String::new()),
            }
        );

        // Objects without a year key are not dates, even with other components
        let value = json!({"month": "05", "day": "12"});
        assert_eq!(DateInput::from_json(&value), DateInput::Unrecognized);
        assert!(is_null_date(&value));

        assert_eq!(DateInput::from_json(&json!(42)), DateInput::Unrecognized);
        assert_eq!(DateInput::from_json(&Value::Null), DateInput::Unrecognized);
    }

    #[test]
    fn test_is_null_date() {
        assert!(is_null_date(""));
        assert!(is_null_date(&parts("", "", "")));
        assert!(is_null_date(&DateParts {
            year: Some(String::new()),
            month: None,
            day: Some(String::new()),
        }));
        assert!(!is_null_date("+001999"));
        assert!(!is_null_date(&parts("", "", "3")));
        assert!(is_null_date(DateInput::Unrecognized));
    }

    #[test]
    fn test_year_only_round_trip() {
        for year in ["1999", "-44", "0", "999999", "-999999"] {
            let formatted = parts(year, "", "").to_iso_string();
            let parsed = parse_iso_date(formatted.as_deref());
            assert_eq!(
                parsed.numeric_year(),
                year.parse::<i64>().ok(),
                "year {year}"
            );
            assert_eq!(parsed.month(), None);
            assert_eq!(parsed.day(), None);
        }
    }

    #[test]
    fn test_partial_round_trip_keeps_components() {
        let original = parts("-1200", "02", "");
        let parsed = parse_iso_date(original.to_iso_string().as_deref());
        assert_eq!(parsed, original);

        let original = parts("1066", "10", "14");
        let parsed = parse_iso_date(original.to_iso_string().as_deref());
        assert_eq!(parsed.numeric_year(), Some(1066));
        assert_eq!(parsed.month(), Some("10"));
        assert_eq!(parsed.day(), Some("14"));
    }

    #[test]
    fn test_date_parts_serde() {
        let date = parts("-44", "03", "");
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, r#"{"year":"-44","month":"03"}"#);

        let parsed: DateParts = serde_json::from_str(r#"{"year":"-44","month":"03"}"#).unwrap();
        assert_eq!(parsed, date);

        let empty: DateParts = serde_json::from_str("{}").unwrap();
        assert!(empty.is_null());
    }

    #[test]
    fn test_parse_error_display() {
        assert_eq!(
            ParseError::InvalidMonth(13).to_string(),
            "Invalid month: 13 (must be 1-12)"
        );
        assert_eq!(
            ParseError::InvalidDay {
                year: 2023,
                month: 2,
                day: 30
            }
            .to_string(),
            "Invalid day 30 for month 2 of year 2023"
        );
        assert_eq!(ParseError::EmptyInput.to_string(), "Empty date string");
    }

    #[test]
    fn test_invalid_year_display_fits_every_cause() {
        assert_eq!(
            ParseError::InvalidYear("+XXXXXX".to_owned()).to_string(),
            "Invalid year: +XXXXXX (expected a signed integer of at most 6 digits)"
        );
        let err = "+1000000".parse::<IsoDate>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid year: +1000000 (expected a signed integer of at most 6 digits)"
        );
        let err = IsoDate::try_from(&DateParts::from_year("abc")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid year: abc (expected a signed integer of at most 6 digits)"
        );
    }
}
