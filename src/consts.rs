/// Width of the zero-padded year magnitude in the extended ISO form
pub const YEAR_WIDTH: usize = 6;

/// Largest year magnitude a strict `Year` accepts (fits in `YEAR_WIDTH` digits)
pub const MAX_YEAR_MAGNITUDE: u32 = 999_999;

/// Sign prefix for common-era years (including year 0)
pub const CE_SIGN: char = '+';
/// Sign prefix for years before the common era
pub const BCE_SIGN: char = '-';

/// Returned in place of an ISO string when the year is missing or not an integer
pub const INVALID_YEAR_SENTINEL: &str = "+XXXXXX";

/// Month segment written when a day is known but its month is not
pub const UNKNOWN_MONTH_PLACEHOLDER: &str = "XX";

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Longest month, the bound for a day whose month is unknown
pub const MAX_DAY: u8 = 31;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Scheme prepended to bare `www.` links
pub const DEFAULT_LINK_SCHEME: &str = "https://";
/// Browsing context opened by generated links
pub const DEFAULT_LINK_TARGET: &str = "_blank";
/// `rel` value forced onto every sanitized anchor
pub const DEFAULT_LINK_REL: &str = "noopener noreferrer";
