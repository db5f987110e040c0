//! Date normalization
//!
//! Statement sources disagree about everything: delimiter, component
//! order, year width, and sometimes the date is a spreadsheet serial
//! number. `normalize_date` resolves all of these to a `NaiveDate` or
//! reports `None` so the caller can skip the row.
//!
//! Known limitation: when day and month are both <= 12 there is no locale
//! indicator to disambiguate them, so day-first ordering is assumed.

use chrono::{Duration, NaiveDate};

/// Two-digit years at or above the pivot map to 19xx, below it to 20xx.
const YEAR_PIVOT: i32 = 50;

/// Days between the spreadsheet serial epoch (1899-12-30) and 1970-01-01.
const SERIAL_UNIX_OFFSET: f64 = 25569.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Serial values outside this window are treated as ordinary numbers, not
/// dates (roughly 1954–2119).
const SERIAL_RANGE: std::ops::Range<f64> = 20_000.0..80_000.0;

/// Fallback formats for dates the triplet and serial paths cannot handle.
const GENERIC_FORMATS: &[&str] = &[
    "%d %b %Y",  // 15 Jan 2024
    "%d-%b-%Y",  // 15-Jan-2024
    "%d-%b-%y",  // 15-Jan-24
    "%d %B %Y",  // 15 January 2024
    "%b %d, %Y", // Jan 15, 2024
    "%B %d, %Y", // January 15, 2024
    "%d.%m.%Y",  // 15.01.2024
    "%Y%m%d",    // 20240115
];

/// Normalize varied date text to a calendar date.
///
/// Tries, in order: slash/dash-delimited numeric triplets, spreadsheet
/// date serials, then a list of generic formats. Returns `None` for
/// anything unparseable; the row is skipped, not the statement.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_delimited_triplet(trimmed)
        .or_else(|| parse_spreadsheet_serial(trimmed))
        .or_else(|| parse_generic(trimmed))
}

/// Parse `a/b/c` or `a-b-c` where all three parts are numeric.
fn parse_delimited_triplet(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split(['/', '-']).map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let nums: Vec<i64> = parts
        .iter()
        .map(|p| p.parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;

    // A four-digit leading part can only be the year (ISO ordering)
    if parts[0].len() == 4 {
        let (year, month, day) = (nums[0] as i32, nums[1] as u32, nums[2] as u32);
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let year = normalize_year(nums[2], parts[2].len());
    let (a, b) = (nums[0], nums[1]);

    // Disambiguate day vs. month: a component over 12 must be the day.
    // When both fit either way, default to day-first (documented above).
    let (mut day, mut month) = if a > 12 {
        (a, b)
    } else if b > 12 {
        (b, a)
    } else {
        (a, b)
    };

    // Correction for inputs that defeated the heuristic
    if month > 12 {
        std::mem::swap(&mut day, &mut month);
    }

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

fn normalize_year(value: i64, digits: usize) -> i32 {
    if digits <= 2 {
        if value < YEAR_PIVOT as i64 {
            2000 + value as i32
        } else {
            1900 + value as i32
        }
    } else {
        value as i32
    }
}

/// Convert a bare number in the spreadsheet date-serial range.
fn parse_spreadsheet_serial(s: &str) -> Option<NaiveDate> {
    let serial: f64 = s.parse().ok()?;
    if !SERIAL_RANGE.contains(&serial) {
        return None;
    }
    let millis = (serial - SERIAL_UNIX_OFFSET) * MS_PER_DAY;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    epoch.checked_add_signed(Duration::milliseconds(millis as i64))
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    GENERIC_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_two_and_four_digit_years() {
        assert_eq!(normalize_date("31/12/23"), Some(date(2023, 12, 31)));
        assert_eq!(normalize_date("31/12/2023"), Some(date(2023, 12, 31)));
        // Pivot: 50–99 land in the 1900s
        assert_eq!(normalize_date("01/06/99"), Some(date(1999, 6, 1)));
        assert_eq!(normalize_date("01/06/49"), Some(date(2049, 6, 1)));
    }

    #[test]
    fn test_day_month_disambiguation() {
        // First part over 12 must be the day
        assert_eq!(normalize_date("25/03/2024"), Some(date(2024, 3, 25)));
        // Second part over 12 must be the day
        assert_eq!(normalize_date("03/25/2024"), Some(date(2024, 3, 25)));
        // Both ambiguous: day-first default
        assert_eq!(normalize_date("02/01/2024"), Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_iso_ordering() {
        assert_eq!(normalize_date("2024-01-15"), Some(date(2024, 1, 15)));
        assert_eq!(normalize_date("2024/01/15"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_dash_delimited() {
        assert_eq!(normalize_date("15-01-2024"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_spreadsheet_serial() {
        // 45292 days after 1899-12-30
        assert_eq!(normalize_date("45292"), Some(date(2024, 1, 1)));
        // Small numbers are not dates
        assert_eq!(normalize_date("500"), None);
    }

    #[test]
    fn test_generic_formats() {
        assert_eq!(normalize_date("15 Jan 2024"), Some(date(2024, 1, 15)));
        assert_eq!(normalize_date("15-Jan-2024"), Some(date(2024, 1, 15)));
        assert_eq!(normalize_date("Jan 15, 2024"), Some(date(2024, 1, 15)));
        assert_eq!(normalize_date("20240115"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("not a date"), None);
        assert_eq!(normalize_date("99/99/99"), None);
        assert_eq!(normalize_date("12/34"), None);
    }
}
