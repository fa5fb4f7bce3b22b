//! Instant string parsing.
//!
//! Accepts the formats a host date parser is expected to understand: ISO 8601
//! (date-only forms are UTC, date-times without an offset are host-local),
//! the `to_string` rendering produced by this crate, and RFC 2822 / RFC 7231.
//! Anything else parses to NaN.

use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;

use crate::calendar::{make_date, make_day, make_time, time_clip, MS_PER_MINUTE};
use crate::offset::resolve_wall;

static ISO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([+-]\d{6}|\d{4})(?:-(\d{2})(?:-(\d{2}))?)?(?:[T ](\d{2}):(\d{2})(?::(\d{2})(?:[.,](\d{1,9}))?)?(Z|[+-]\d{2}:?\d{2})?)?$",
    )
    .expect("ISO pattern is valid")
});

static DISPLAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:Sun|Mon|Tue|Wed|Thu|Fri|Sat) (Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) (\d{1,2}) (-?\d{4,6})(?: (\d{2}):(\d{2}):(\d{2})(?: GMT([+-]\d{4}))?(?: \([^)]*\))?)?$",
    )
    .expect("date string pattern is valid")
});

/// Parse an instant string into a time value, or NaN when unrecognized.
///
/// # Examples
///
/// ```
/// use tz_shift::parse_instant;
///
/// assert_eq!(parse_instant("2020-02-11T08:00:00Z"), 1_581_408_000_000.0);
/// assert_eq!(parse_instant("Tue, 11 Feb 2020 08:00:00 GMT"), 1_581_408_000_000.0);
/// assert!(parse_instant("not a date").is_nan());
/// ```
pub fn parse_instant(input: &str) -> f64 {
    let input = input.trim();
    if let Some(t) = parse_iso(input) {
        return t;
    }
    if let Some(t) = parse_display(input) {
        return t;
    }
    DateTime::parse_from_rfc2822(input)
        .map(|dt| time_clip(dt.timestamp_millis() as f64))
        .unwrap_or(f64::NAN)
}

fn parse_iso(input: &str) -> Option<f64> {
    let caps = ISO_RE.captures(input)?;
    let field = |i: usize| caps.get(i).map(|m| m.as_str());
    let number = |i: usize, default: f64| -> Option<f64> {
        match field(i) {
            Some(s) => s.parse::<f64>().ok(),
            None => Some(default),
        }
    };

    let year_str = field(1)?;
    if year_str == "-000000" {
        return Some(f64::NAN);
    }
    let year = year_str.parse::<f64>().ok()?;
    let month = number(2, 1.0)?;
    let date = number(3, 1.0)?;
    let hours = number(4, 0.0)?;
    let minutes = number(5, 0.0)?;
    let seconds = number(6, 0.0)?;
    let millis = match field(7) {
        Some(frac) => {
            let digits: String = frac.chars().chain("00".chars()).take(3).collect();
            digits.parse::<f64>().ok()?
        }
        None => 0.0,
    };

    let valid_date = (1.0..=12.0).contains(&month)
        && date >= 1.0
        && date <= days_in_month(year, month - 1.0);
    let valid_clock = (hours < 24.0 && minutes < 60.0 && seconds < 60.0)
        || (hours == 24.0 && minutes == 0.0 && seconds == 0.0 && millis == 0.0);
    if !valid_date || !valid_clock {
        return Some(f64::NAN);
    }

    let wall = make_date(
        make_day(year, month - 1.0, date),
        make_time(hours, minutes, seconds, millis),
    );
    let has_time = field(4).is_some();
    let t = match field(8) {
        Some("Z") => wall,
        Some(offset) => wall - offset_minutes(offset)? * MS_PER_MINUTE,
        // Date-only forms are UTC; local date-times follow the host zone.
        None if !has_time => wall,
        None => resolve_wall(None, wall),
    };
    Some(time_clip(t))
}

fn parse_display(input: &str) -> Option<f64> {
    let caps = DISPLAY_RE.captures(input)?;
    let month = match &caps[1] {
        "Jan" => 0.0,
        "Feb" => 1.0,
        "Mar" => 2.0,
        "Apr" => 3.0,
        "May" => 4.0,
        "Jun" => 5.0,
        "Jul" => 6.0,
        "Aug" => 7.0,
        "Sep" => 8.0,
        "Oct" => 9.0,
        "Nov" => 10.0,
        _ => 11.0,
    };
    let date = caps[2].parse::<f64>().ok()?;
    let year = caps[3].parse::<f64>().ok()?;
    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let (hours, minutes, seconds) = (part(4), part(5), part(6));
    if date < 1.0
        || date > days_in_month(year, month)
        || hours > 23.0
        || minutes > 59.0
        || seconds > 59.0
    {
        return Some(f64::NAN);
    }
    let wall = make_date(
        make_day(year, month, date),
        make_time(hours, minutes, seconds, 0.0),
    );
    let t = match caps.get(7) {
        Some(offset) => wall - offset_minutes(offset.as_str())? * MS_PER_MINUTE,
        None => resolve_wall(None, wall),
    };
    Some(time_clip(t))
}

/// Minutes east of UTC for `±HH:MM` or `±HHMM`.
fn offset_minutes(offset: &str) -> Option<f64> {
    let negative = offset.starts_with('-');
    let digits: String = offset[1..].chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 {
        return None;
    }
    let hours = digits[..2].parse::<f64>().ok()?;
    let minutes = digits[2..].parse::<f64>().ok()?;
    if hours > 23.0 || minutes > 59.0 {
        return None;
    }
    let total = hours * 60.0 + minutes;
    Some(if negative { -total } else { total })
}

fn days_in_month(year: f64, month: f64) -> f64 {
    let start = make_day(year, month, 1.0);
    make_day(year, month + 1.0, 1.0) - start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_utc_date_time() {
        assert_eq!(parse_instant("1987-02-11T00:00:00Z"), 540_000_000_000.0);
        assert_eq!(parse_instant("2020-01-01T00:00:00.000Z"), 1_577_836_800_000.0);
    }

    #[test]
    fn test_parse_iso_date_only_is_utc() {
        assert_eq!(parse_instant("2024-02-11"), 1_707_609_600_000.0);
        assert_eq!(parse_instant("2024-02"), 1_706_745_600_000.0);
        assert_eq!(parse_instant("2024"), 1_704_067_200_000.0);
    }

    #[test]
    fn test_parse_iso_with_offset() {
        assert_eq!(
            parse_instant("2024-02-11T12:30:45.987-05:00"),
            parse_instant("2024-02-11T17:30:45.987Z")
        );
        assert_eq!(
            parse_instant("2020-01-01T00:00:00+0530"),
            parse_instant("2019-12-31T18:30:00Z")
        );
    }

    #[test]
    fn test_parse_iso_fraction_padding() {
        assert_eq!(parse_instant("1970-01-01T00:00:00.5Z"), 500.0);
        assert_eq!(parse_instant("1970-01-01T00:00:00.123456Z"), 123.0);
    }

    #[test]
    fn test_parse_iso_end_of_day() {
        assert_eq!(parse_instant("2020-01-01T24:00:00Z"), parse_instant("2020-01-02T00:00:00Z"));
        assert!(parse_instant("2020-01-01T24:00:01Z").is_nan());
    }

    #[test]
    fn test_parse_iso_expanded_year() {
        assert_eq!(parse_instant("+002020-01-01T00:00:00Z"), 1_577_836_800_000.0);
        assert!(parse_instant("-000000-01-01T00:00:00Z").is_nan());
    }

    #[test]
    fn test_parse_rejects_out_of_range_fields() {
        assert!(parse_instant("2021-02-29").is_nan());
        assert!(parse_instant("2020-13-01").is_nan());
        assert!(parse_instant("2020-01-01T12:60:00Z").is_nan());
        assert!(parse_instant("2020-01-01T00:00:00+24:00").is_nan());
    }

    #[test]
    fn test_parse_display_format() {
        assert_eq!(
            parse_instant("Wed Jan 01 2020 00:00:00 GMT+0800 (Singapore Standard Time)"),
            parse_instant("2019-12-31T16:00:00Z")
        );
        assert_eq!(
            parse_instant("Mon Jun 01 2020 00:00:00 GMT-0400"),
            parse_instant("2020-06-01T04:00:00Z")
        );
    }

    #[test]
    fn test_parse_rfc_formats() {
        assert_eq!(parse_instant("Tue, 11 Feb 2020 08:00:00 GMT"), 1_581_408_000_000.0);
        assert_eq!(parse_instant("Tue, 11 Feb 2020 16:00:00 +0800"), 1_581_408_000_000.0);
    }

    #[test]
    fn test_parse_garbage_is_nan() {
        assert!(parse_instant("").is_nan());
        assert!(parse_instant("yesterday").is_nan());
        assert!(parse_instant("2020-01-01Z").is_nan());
    }
}
