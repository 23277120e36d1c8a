//! Expiry date parsing and formatting.
//!
//! Expiry dates are stored as free text in `YYYY-MM-DD` form. Parsing is
//! deliberately lenient: components need no zero padding, and out-of-range
//! months or days roll over into the following month or year instead of
//! being rejected, so `2025-02-30` reads as `2025-03-02`.

use time::{Date, Duration, Month};

use crate::error::{ParseError, ParseResult};

/// Parse an expiry string into a normalized calendar date.
///
/// # Examples
///
/// ```
/// use medstock_types::expiry::{format_date, parse_expiry_date};
///
/// let date = parse_expiry_date("2025-1-5").unwrap();
/// assert_eq!(format_date(date), "2025-01-05");
///
/// let rolled = parse_expiry_date("2025-02-30").unwrap();
/// assert_eq!(format_date(rolled), "2025-03-02");
///
/// assert!(parse_expiry_date("next tuesday").is_err());
/// ```
pub fn parse_expiry_date(text: &str) -> ParseResult<Date> {
    let (year, month, day) = split_components(text)?;
    normalize(year, month, day).ok_or_else(|| ParseError::DateOutOfRange(text.to_string()))
}

/// Parse an expiry string, requiring every component to be in range.
///
/// Used where input is validated up front (CSV import) rather than
/// tolerated, so `2025-02-30` is rejected here.
pub fn parse_calendar_date(text: &str) -> ParseResult<Date> {
    let (year, month, day) = split_components(text)?;
    let month = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| ParseError::DateOutOfRange(text.to_string()))?;
    let day = u8::try_from(day).map_err(|_| ParseError::DateOutOfRange(text.to_string()))?;
    Date::from_calendar_date(year, month, day)
        .map_err(|_| ParseError::DateOutOfRange(text.to_string()))
}

/// Format a date as zero-padded `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn split_components(text: &str) -> ParseResult<(i32, i64, i64)> {
    let invalid = || ParseError::InvalidDate(text.to_string());

    let mut parts = text.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let year: i32 = year.trim().parse().map_err(|_| invalid())?;
    let month: i64 = month.trim().parse().map_err(|_| invalid())?;
    let day: i64 = day.trim().parse().map_err(|_| invalid())?;
    Ok((year, month, day))
}

/// Roll month and day overflow forward the way calendar arithmetic does.
fn normalize(year: i32, month: i64, day: i64) -> Option<Date> {
    let month_index = month.checked_sub(1)?;
    let year = i64::from(year).checked_add(month_index.div_euclid(12))?;
    let year = i32::try_from(year).ok()?;
    let month = Month::try_from(u8::try_from(month_index.rem_euclid(12) + 1).ok()?).ok()?;

    let first = Date::from_calendar_date(year, month, 1).ok()?;
    first.checked_add(Duration::days(day.checked_sub(1)?))
}
