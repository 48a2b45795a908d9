use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    BCE_SIGN, CE_SIGN, DATE_SEPARATOR, DateParts, ParseError, UNKNOWN_MONTH_PLACEHOLDER,
    YEAR_WIDTH, format_iso_from_date_parts, prelude::*,
    types::{Day, Month, Year},
};

/// Validated extended ISO date with varying precision.
///
/// Unlike [`DateParts`], every component is range checked, so this is what
/// form validators build before accepting user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum IsoDate {
    /// Full date with day, month, and year
    #[display(fmt = "{}-{}-{}", "year", "month", "day")]
    Day { year: Year, month: Month, day: Day },
    /// Month and year only
    #[display(fmt = "{}-{}", "year", "month")]
    Month { year: Year, month: Month },
    /// Year only
    #[display(fmt = "{}", "year")]
    Year { year: Year },
    /// Day and year, month unknown
    #[display(fmt = "{}-{}-{}", "year", "UNKNOWN_MONTH_PLACEHOLDER", "day")]
    DayOfUnknownMonth { year: Year, day: Day },
}

/// How much information a [`DateParts`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateClass {
    /// Nothing provided
    Null,
    /// Something provided, but the year is missing or not an integer
    InvalidYear,
    /// Integer year with month or day (or both) missing
    Partial,
    /// Integer year, month and day
    Complete,
}

/// Error type for [`try_format`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Year is missing or not an integer.
    #[error("Invalid year: {0:?} is not an integer")]
    InvalidYear(Option<String>),
}

impl IsoDate {
    /// Returns the year component (always present)
    pub const fn year(&self) -> Year {
        match *self {
            Self::Day { year, .. }
            | Self::Month { year, .. }
            | Self::Year { year }
            | Self::DayOfUnknownMonth { year, .. } => year,
        }
    }

    /// Returns the month component if known
    pub const fn month(&self) -> Option<Month> {
        match *self {
            Self::Day { month, .. } | Self::Month { month, .. } => Some(month),
            Self::Year { .. } | Self::DayOfUnknownMonth { .. } => None,
        }
    }

    /// Returns the day component if known
    pub const fn day(&self) -> Option<Day> {
        match *self {
            Self::Day { day, .. } | Self::DayOfUnknownMonth { day, .. } => Some(day),
            Self::Month { .. } | Self::Year { .. } => None,
        }
    }

    /// Builds a date from numeric components, validating each one
    ///
    /// # Errors
    /// Returns the `ParseError` of the first component that is out of range.
    pub fn from_components(
        year: i32,
        month: Option<u8>,
        day: Option<u8>,
    ) -> Result<Self, ParseError> {
        let year = Year::new(year)?;
        match (month, day) {
            (Some(m), Some(d)) => Ok(Self::Day {
                year,
                month: Month::new(m)?,
                day: Day::new(d, year.get(), m)?,
            }),
            (Some(m), None) => Ok(Self::Month {
                year,
                month: Month::new(m)?,
            }),
            (None, Some(d)) => Ok(Self::DayOfUnknownMonth {
                year,
                day: Day::of_unknown_month(d, year.get())?,
            }),
            (None, None) => Ok(Self::Year { year }),
        }
    }

    /// Year segment: sign plus exactly `YEAR_WIDTH` digits
    fn parse_year(signed: &str) -> Result<Year, ParseError> {
        let invalid = || ParseError::InvalidYear(signed.to_owned());
        let mut chars = signed.chars();
        let negative = match chars.next() {
            Some(CE_SIGN) => false,
            Some(BCE_SIGN) => true,
            _ => return Err(invalid()),
        };
        let digits = chars.as_str();
        if digits.len() != YEAR_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let magnitude: i32 = digits.parse().map_err(|_| invalid())?;
        Year::new(if negative { -magnitude } else { magnitude })
    }

    /// Month or day segment: exactly two digits
    fn parse_two_digits(s: &str) -> Result<u8, ParseError> {
        if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat(s.to_owned()));
        }
        s.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    /// Loose form input: plain integers with optional sign or padding
    fn parse_component<T: FromStr>(s: &str) -> Result<T, ParseError> {
        s.trim()
            .parse::<T>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }
}

impl FromStr for IsoDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // The sign is part of the year, so split after it
        let sign_len = trimmed.chars().next().map_or(0, char::len_utf8);
        let (sign, rest) = trimmed.split_at(sign_len);
        let mut parts = rest.split(DATE_SEPARATOR);
        let year_digits = parts.next().unwrap_or_default();
        let year = Self::parse_year(&format!("{sign}{year_digits}"))?;

        let parts: Vec<&str> = parts.collect();
        let date = match parts.as_slice() {
            [] => Self::Year { year },
            [month] if *month == UNKNOWN_MONTH_PLACEHOLDER => {
                return Err(ParseError::InvalidFormat(format!(
                    "Month placeholder {UNKNOWN_MONTH_PLACEHOLDER} without a day: {s}"
                )));
            }
            [month] => Self::Month {
                year,
                month: Month::new(Self::parse_two_digits(month)?)?,
            },
            [month, day] if *month == UNKNOWN_MONTH_PLACEHOLDER => Self::DayOfUnknownMonth {
                year,
                day: Day::of_unknown_month(Self::parse_two_digits(day)?, year.get())?,
            },
            [month, day] => {
                let month = Self::parse_two_digits(month)?;
                let day = Self::parse_two_digits(day)?;
                Self::Day {
                    year,
                    month: Month::new(month)?,
                    day: Day::new(day, year.get(), month)?,
                }
            }
            _ => {
                return Err(ParseError::InvalidFormat(format!(
                    "Too many {DATE_SEPARATOR} separators: expected 0-2, found {}",
                    parts.len()
                )));
            }
        };
        Ok(date)
    }
}

impl TryFrom<&DateParts> for IsoDate {
    type Error = ParseError;

    fn try_from(parts: &DateParts) -> Result<Self, Self::Error> {
        if parts.is_null() {
            return Err(ParseError::EmptyInput);
        }
        let raw_year = parts.year().unwrap_or_default();
        let year = parts
            .numeric_year()
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| ParseError::InvalidYear(raw_year.to_owned()))?;
        let day = parts.day().map(Self::parse_component::<u8>).transpose()?;
        let month = match parts.month() {
            Some(UNKNOWN_MONTH_PLACEHOLDER) if day.is_none() => {
                return Err(ParseError::InvalidFormat(format!(
                    "Month placeholder {UNKNOWN_MONTH_PLACEHOLDER} without a day: {parts:?}"
                )));
            }
            Some(UNKNOWN_MONTH_PLACEHOLDER) | None => None,
            Some(m) => Some(Self::parse_component::<u8>(m)?),
        };

        Self::from_components(year, month, day).inspect_err(|err| {
            tracing::debug!(?parts, %err, "date components failed validation");
        })
    }
}

impl TryFrom<DateParts> for IsoDate {
    type Error = ParseError;

    fn try_from(parts: DateParts) -> Result<Self, Self::Error> {
        Self::try_from(&parts)
    }
}

/// Plain integer year and zero-padded month and day, as a form would hold them.
impl From<IsoDate> for DateParts {
    fn from(date: IsoDate) -> Self {
        Self {
            year: Some(date.year().get().to_string()),
            month: date.month().map(|m| m.to_string()),
            day: date.day().map(|d| d.to_string()),
        }
    }
}

impl Serialize for IsoDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IsoDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Sorts a date into the null / invalid-year / partial / complete taxonomy.
pub fn classify(parts: &DateParts) -> DateClass {
    if parts.is_null() {
        DateClass::Null
    } else if parts.numeric_year().is_none() {
        DateClass::InvalidYear
    } else if known_month(parts).is_some() && parts.day().is_some() {
        DateClass::Complete
    } else {
        DateClass::Partial
    }
}

fn known_month(parts: &DateParts) -> Option<&str> {
    parts.month().filter(|m| *m != UNKNOWN_MONTH_PLACEHOLDER)
}

/// Like [`format_iso_from_date_parts`], but reports a bad year as an error
/// instead of the `+XXXXXX` sentinel.
///
/// # Errors
/// Returns `FormatError::InvalidYear` if the date is not null and its year
/// is missing or not an integer.
pub fn try_format(parts: &DateParts) -> Result<Option<String>, FormatError> {
    match classify(parts) {
        DateClass::Null => Ok(None),
        DateClass::InvalidYear => Err(FormatError::InvalidYear(parts.year.clone())),
        DateClass::Partial | DateClass::Complete => Ok(format_iso_from_date_parts(Some(parts))),
    }
}
