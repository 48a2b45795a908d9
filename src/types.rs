use crate::consts::{
    BCE_SIGN, CE_SIGN, CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    LEAP_YEAR_CYCLE, MAX_DAY, MAX_MONTH, MAX_YEAR_MAGNITUDE, YEAR_WIDTH,
};
use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// A signed year whose magnitude fits the six-digit extended ISO form.
///
/// Negative values are years before the common era, using astronomical
/// numbering (0 is 1 BCE, -1 is 2 BCE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Year(i32);

impl Year {
    /// Creates a new Year, validating that its magnitude is <= `MAX_YEAR_MAGNITUDE`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the magnitude is too large.
    pub fn new(value: i32) -> Result<Self, ParseError> {
        if value.unsigned_abs() > MAX_YEAR_MAGNITUDE {
            return Err(ParseError::InvalidYear(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Returns the year value as i32
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// True for years before the common era
    #[inline]
    pub const fn is_bce(self) -> bool {
        self.0 < 0
    }
}

impl TryFrom<i32> for Year {
    type Error = ParseError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for i32 {
    fn from(year: Year) -> Self {
        year.0
    }
}

/// Renders the signed, zero-padded form used on the wire (`+001999`, `-000044`).
impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_bce() { BCE_SIGN } else { CE_SIGN };
        write!(f, "{sign}{:0width$}", self.0.unsigned_abs(), width = YEAR_WIDTH)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0.get())
    }
}

/// A day of month. Validated against its year and month when both are
/// known, and against the longest month otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it exists in the given year and month
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or past the end of the month.
    pub fn new(value: u8, year: i32, month: u8) -> Result<Self, ParseError> {
        let invalid = ParseError::InvalidDay {
            year,
            month,
            day: value,
        };
        let non_zero = NonZeroU8::new(value).ok_or_else(|| invalid.clone())?;
        if month == 0 || month > MAX_MONTH || value > days_in_month(year, month) {
            return Err(invalid);
        }
        Ok(Self(non_zero))
    }

    /// Creates a Day for a date whose month is unknown (`XX` placeholder)
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` (with month 0) if the value is 0 or > `MAX_DAY`.
    pub fn of_unknown_month(value: u8, year: i32) -> Result<Self, ParseError> {
        match NonZeroU8::new(value) {
            Some(non_zero) if value <= MAX_DAY => Ok(Self(non_zero)),
            _ => Err(ParseError::InvalidDay {
                year,
                month: 0,
                day: value,
            }),
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // No year or month context here
        Self::of_unknown_month(value, 0)
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0.get())
    }
}

/// Proleptic Gregorian leap year rule, valid for negative (astronomical) years.
pub const fn is_leap_year(year: i32) -> bool {
    (year.rem_euclid(LEAP_YEAR_CYCLE) == 0 && year.rem_euclid(CENTURY_CYCLE) != 0)
        || year.rem_euclid(GREGORIAN_CYCLE) == 0
}

pub const fn days_in_month(year: i32, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
