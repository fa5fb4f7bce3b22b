//! UTC offset resolution.
//!
//! The offset of a zone at an instant is read by rendering the instant in
//! the zone's offset-revealing style ("GMT+05:45") and parsing the result.
//! Formatters that cannot render offsets fall back to differencing wall
//! clock readings, and identifiers no formatter accepts are tried as fixed
//! `±HH[:MM]` offsets.
//!
//! Two process-wide caches back this module, one of compiled formatters per
//! identifier and one of parsed minutes per offset string. Both live for the
//! whole process and are never evicted; their size is bounded by the zones
//! and historical offsets actually seen.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use regex::Regex;
use tracing::{debug, trace};

use crate::calendar::{time_clip, MS_PER_DAY, MS_PER_MINUTE, MS_PER_SECOND};
use crate::error::{Result, TzError};
use crate::format::{LocalFormat, TzdbFormat, ZoneFormat};
use crate::value::TimeValue;

type FormatterCache = HashMap<Option<String>, Arc<dyn ZoneFormat>>;

static FORMATTERS: LazyLock<RwLock<FormatterCache>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

static OFFSETS: LazyLock<RwLock<HashMap<String, f64>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

static FIXED_OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])(\d{2}):?(\d{2})?$").expect("fixed offset pattern is valid")
});

// ── Public API ──────────────────────────────────────────────────────────────

/// UTC offset of `time_zone` at `date`, in minutes east of UTC.
///
/// `time_zone` may be an IANA identifier, a fixed offset (`"+05:30"`,
/// `"-0230"`, `"+05"`), or `None` for the host zone. Returns NaN when the
/// instant is invalid or the zone cannot be resolved.
///
/// # Examples
///
/// ```
/// use tz_shift::resolve_offset;
///
/// assert_eq!(resolve_offset(Some("Asia/Kathmandu"), "2020-01-15T00:00:00Z"), 345.0);
/// assert_eq!(resolve_offset(Some("-02:30"), &0.0), -150.0);
/// assert!(resolve_offset(Some("Etc/Invalid"), &0.0).is_nan());
/// ```
pub fn resolve_offset<T: TimeValue + ?Sized>(time_zone: Option<&str>, date: &T) -> f64 {
    offset_at(time_zone, date.time_value())
}

/// Minutes encoded in a formatted string ending in `GMT±H[H][:MM]`.
///
/// The text before `GMT` is ignored; a bare `GMT` is zero. Malformed
/// offsets give NaN.
///
/// ```
/// use tz_shift::parse_gmt_offset;
///
/// assert_eq!(parse_gmt_offset("5:53 PM GMT-9:30"), -570.0);
/// assert_eq!(parse_gmt_offset("5 GMT+08:00"), 480.0);
/// assert_eq!(parse_gmt_offset("5:53 PM GMT"), 0.0);
/// ```
pub fn parse_gmt_offset(formatted: &str) -> f64 {
    let offset = formatted.split("GMT").nth(1).unwrap_or("");
    cached_offset(offset)
}

// ── Resolution ──────────────────────────────────────────────────────────────

pub(crate) fn offset_at(time_zone: Option<&str>, time: f64) -> f64 {
    if time.is_nan() {
        return f64::NAN;
    }
    match formatter(time_zone) {
        Ok(fmt) => offset_with(fmt.as_ref(), time),
        Err(_) => time_zone.map_or(f64::NAN, fixed_offset),
    }
}

pub(crate) fn offset_with(fmt: &dyn ZoneFormat, time: f64) -> f64 {
    match fmt.long_offset(time) {
        Ok(formatted) => parse_gmt_offset(&formatted),
        Err(TzError::UnsupportedStyle(_)) => match fmt.wall_clock(time) {
            Some(wall) => cached_offset(&wall_clock_offset(wall, time)),
            None => f64::NAN,
        },
        Err(_) => f64::NAN,
    }
}

/// `±HH:MM` from the difference between a wall clock reading and the
/// instant it was read at, both truncated to the second.
fn wall_clock_offset(wall: f64, time: f64) -> String {
    let seconds = |t: f64| (t / MS_PER_SECOND).floor() * MS_PER_SECOND;
    let minutes = ((seconds(wall) - seconds(time)) / MS_PER_MINUTE).round() as i64;
    let sign = if minutes < 0 { '-' } else { '+' };
    format!("{sign}{:02}:{:02}", minutes.abs() / 60, minutes.abs() % 60)
}

/// Compiled formatter for `time_zone`, from the cache when possible.
pub(crate) fn formatter(time_zone: Option<&str>) -> Result<Arc<dyn ZoneFormat>> {
    let key = time_zone.map(str::to_string);
    if let Some(fmt) = FORMATTERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(Arc::clone(fmt));
    }

    let fmt: Arc<dyn ZoneFormat> = match time_zone {
        Some(id) => Arc::new(TzdbFormat::new(id)?),
        None => Arc::new(LocalFormat::new()),
    };
    debug!(time_zone = fmt.time_zone(), "compiled zone formatter");
    FORMATTERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert_with(|| Arc::clone(&fmt));
    Ok(fmt)
}

/// Parse a `±HH[:MM]` identifier no formatter accepts.
pub(crate) fn fixed_offset(time_zone: &str) -> f64 {
    if let Some(minutes) = OFFSETS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(time_zone)
    {
        return *minutes;
    }
    let Some(caps) = FIXED_OFFSET_RE.captures(time_zone) else {
        return f64::NAN;
    };
    let hours: u32 = caps[2].parse().unwrap_or(u32::MAX);
    let minutes: u32 = caps.get(3).map_or(Ok(0), |m| m.as_str().parse()).unwrap_or(u32::MAX);
    if hours > 23 || minutes > 59 {
        return f64::NAN;
    }
    debug!(time_zone, "resolved identifier as a fixed offset");
    let total = f64::from(hours * 60 + minutes);
    // `+ 0.0` keeps "-00:00" from resolving to -0.
    let value = if &caps[1] == "-" { -total + 0.0 } else { total };
    remember(time_zone, value);
    value
}

/// Minutes of an offset string such as `"+05:45"`, `"-9:30"` or `""`.
fn cached_offset(offset: &str) -> f64 {
    if let Some(minutes) = OFFSETS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(offset)
    {
        return *minutes;
    }
    let value = calc_offset(offset);
    if value.is_finite() {
        remember(offset, value);
    }
    value
}

fn remember(key: &str, minutes: f64) {
    trace!(key, minutes, "cached offset");
    OFFSETS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key.to_string(), minutes);
}

/// The sign applies to the whole offset, so `"-00:30"` is -30.
fn calc_offset(offset: &str) -> f64 {
    let mut parts = offset.split(':');
    let hours_part = parts.next().unwrap_or("");
    let minutes_part = parts.next().unwrap_or("");
    let (negative, hours_digits) = match hours_part.as_bytes().first() {
        Some(b'-') => (true, &hours_part[1..]),
        Some(b'+') => (false, &hours_part[1..]),
        _ => (false, hours_part),
    };
    let number = |s: &str| -> f64 {
        if s.is_empty() {
            0.0
        } else if s.bytes().all(|b| b.is_ascii_digit()) {
            s.parse::<f64>().unwrap_or(f64::NAN)
        } else {
            f64::NAN
        }
    };
    let total = number(hours_digits) * 60.0 + number(minutes_part);
    if negative {
        -total + 0.0
    } else {
        total
    }
}

// ── Wall clock resolution ───────────────────────────────────────────────────

/// The instant at which clocks in `time_zone` read `wall`.
///
/// `wall` is a UTC-domain time value holding the wall clock fields. The
/// offsets one day either side are the two candidates. A reading both
/// candidates reproduce (a fall-back overlap) resolves to the earlier
/// instant; a reading neither reproduces (a spring-forward gap) moves
/// forward by the length of the gap.
pub(crate) fn resolve_wall(time_zone: Option<&str>, wall: f64) -> f64 {
    if wall.is_nan() {
        return f64::NAN;
    }
    let before = offset_at(time_zone, wall - MS_PER_DAY);
    let after = offset_at(time_zone, wall + MS_PER_DAY);
    if before.is_nan() || after.is_nan() {
        return f64::NAN;
    }
    let early = wall - before * MS_PER_MINUTE;
    if before == after {
        return time_clip(early);
    }
    let late = wall - after * MS_PER_MINUTE;
    let early_ok = offset_at(time_zone, early) == before;
    let late_ok = offset_at(time_zone, late) == after;
    let t = match (early_ok, late_ok) {
        (true, true) => early.min(late),
        (false, true) => late,
        _ => early,
    };
    time_clip(t)
}
