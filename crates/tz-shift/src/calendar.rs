//! UTC-domain calendar arithmetic on time values.
//!
//! A time value is an `f64` count of milliseconds since 1970-01-01T00:00:00Z,
//! with NaN standing for an invalid instant. The functions here follow the
//! native date algorithms of the ECMAScript host: component extraction,
//! `MakeDay`/`MakeTime`/`MakeDate` with overflow carry between fields, and
//! `TimeClip` to the ±8.64e15 ms range. Every function propagates NaN.

use std::time::{SystemTime, UNIX_EPOCH};

pub const MS_PER_SECOND: f64 = 1_000.0;
pub const MS_PER_MINUTE: f64 = 60_000.0;
pub const MS_PER_HOUR: f64 = 3_600_000.0;
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Largest magnitude a time value may have.
pub const MAX_TIME: f64 = 8.64e15;

/// Cumulative day counts at the start of each month in a common year.
const MONTH_STARTS: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// A settable calendar field.
///
/// Each field's setter takes the field itself plus the finer fields the
/// native setter accepts, e.g. `Hours` takes hours, minutes, seconds and
/// milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FullYear,
    Month,
    Date,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

/// Current time as a time value.
pub fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(f64::NAN)
}

pub fn day(t: f64) -> f64 {
    (t / MS_PER_DAY).floor()
}

pub fn time_within_day(t: f64) -> f64 {
    t.rem_euclid(MS_PER_DAY)
}

fn is_leap_year(y: i64) -> bool {
    y.rem_euclid(4) == 0 && (y.rem_euclid(100) != 0 || y.rem_euclid(400) == 0)
}

fn day_from_year(y: i64) -> i64 {
    365 * (y - 1970) + (y - 1969).div_euclid(4) - (y - 1901).div_euclid(100)
        + (y - 1601).div_euclid(400)
}

fn time_from_year(y: i64) -> f64 {
    day_from_year(y) as f64 * MS_PER_DAY
}

pub fn year_from_time(t: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    // Before the epoch the 366-day estimate is the later of the two.
    let a = (t / MS_PER_DAY / 366.0 + 1970.0).floor() as i64;
    let b = (t / MS_PER_DAY / 365.0 + 1970.0).ceil() as i64;
    let mut lo = a.min(b) - 1;
    let mut hi = a.max(b) + 1;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if time_from_year(mid) <= t {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    (lo - 1) as f64
}

/// Zero-based day of the year and whether the year is a leap year.
fn day_within_year(t: f64) -> (i32, i32) {
    let year = year_from_time(t) as i64;
    let d = (day(t) as i64 - day_from_year(year)) as i32;
    (d, is_leap_year(year) as i32)
}

pub fn month_from_time(t: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    let (d, leap) = day_within_year(t);
    let month = (1..12)
        .rev()
        .find(|&m| d >= MONTH_STARTS[m] + if m >= 2 { leap } else { 0 })
        .unwrap_or(0);
    month as f64
}

pub fn date_from_time(t: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    let (d, leap) = day_within_year(t);
    let m = month_from_time(t) as usize;
    let start = MONTH_STARTS[m] + if m >= 2 { leap } else { 0 };
    (d - start + 1) as f64
}

/// Day of the week, 0 = Sunday.
pub fn week_day(t: f64) -> f64 {
    (day(t) + 4.0).rem_euclid(7.0)
}

pub fn hour_from_time(t: f64) -> f64 {
    (time_within_day(t) / MS_PER_HOUR).floor()
}

pub fn min_from_time(t: f64) -> f64 {
    (time_within_day(t) / MS_PER_MINUTE).floor().rem_euclid(60.0)
}

pub fn sec_from_time(t: f64) -> f64 {
    (time_within_day(t) / MS_PER_SECOND).floor().rem_euclid(60.0)
}

pub fn ms_from_time(t: f64) -> f64 {
    time_within_day(t).rem_euclid(MS_PER_SECOND)
}

pub fn make_time(hour: f64, min: f64, sec: f64, ms: f64) -> f64 {
    if !hour.is_finite() || !min.is_finite() || !sec.is_finite() || !ms.is_finite() {
        return f64::NAN;
    }
    hour.trunc() * MS_PER_HOUR + min.trunc() * MS_PER_MINUTE + sec.trunc() * MS_PER_SECOND
        + ms.trunc()
}

/// Day number of `date` (1-based, may overflow) in `month` (0-based, may
/// overflow) of `year`.
pub fn make_day(year: f64, month: f64, date: f64) -> f64 {
    if !year.is_finite() || !month.is_finite() || !date.is_finite() {
        return f64::NAN;
    }
    let ym = year.trunc() + (month.trunc() / 12.0).floor();
    // Well past the clip range; keeps the integer year arithmetic in bounds.
    if ym.abs() > 1.0e6 {
        return f64::NAN;
    }
    let mn = month.trunc().rem_euclid(12.0) as usize;
    let ym = ym as i64;
    let leap = if mn >= 2 && is_leap_year(ym) { 1 } else { 0 };
    (day_from_year(ym) + (MONTH_STARTS[mn] + leap) as i64) as f64 + date.trunc() - 1.0
}

pub fn make_date(day: f64, time: f64) -> f64 {
    if !day.is_finite() || !time.is_finite() {
        return f64::NAN;
    }
    day * MS_PER_DAY + time
}

pub fn time_clip(time: f64) -> f64 {
    if !time.is_finite() || time.abs() > MAX_TIME {
        return f64::NAN;
    }
    // `+ 0.0` folds -0 into +0.
    time.trunc() + 0.0
}

/// Two-digit years in component construction refer to the 1900s.
pub fn make_full_year(year: f64) -> f64 {
    if year.is_nan() {
        return f64::NAN;
    }
    let y = year.trunc();
    if (0.0..=99.0).contains(&y) {
        1900.0 + y
    } else {
        year
    }
}

/// Apply a native UTC-domain setter to `t`.
///
/// `args[0]` is the value of `field` itself; the remaining entries are the
/// finer fields the setter accepts. A `None` (or missing) trailing argument
/// keeps that component of `t`. Out-of-range values carry into the next
/// larger field. Setting the full year of an invalid time value starts from
/// +0; every other setter leaves an invalid time value invalid.
pub fn set_utc_field(t: f64, field: Field, args: &[Option<f64>]) -> f64 {
    if t.is_nan() && field != Field::FullYear {
        return f64::NAN;
    }
    let t = if t.is_nan() { 0.0 } else { t };
    let arg = |i: usize, current: f64| match args.get(i) {
        Some(Some(v)) => *v,
        Some(None) | None if i > 0 => current,
        _ => f64::NAN,
    };

    let value = match field {
        Field::FullYear => make_date(
            make_day(
                arg(0, f64::NAN),
                arg(1, month_from_time(t)),
                arg(2, date_from_time(t)),
            ),
            time_within_day(t),
        ),
        Field::Month => make_date(
            make_day(
                year_from_time(t),
                arg(0, f64::NAN),
                arg(1, date_from_time(t)),
            ),
            time_within_day(t),
        ),
        Field::Date => make_date(
            make_day(year_from_time(t), month_from_time(t), arg(0, f64::NAN)),
            time_within_day(t),
        ),
        Field::Hours => make_date(
            day(t),
            make_time(
                arg(0, f64::NAN),
                arg(1, min_from_time(t)),
                arg(2, sec_from_time(t)),
                arg(3, ms_from_time(t)),
            ),
        ),
        Field::Minutes => make_date(
            day(t),
            make_time(
                hour_from_time(t),
                arg(0, f64::NAN),
                arg(1, sec_from_time(t)),
                arg(2, ms_from_time(t)),
            ),
        ),
        Field::Seconds => make_date(
            day(t),
            make_time(
                hour_from_time(t),
                min_from_time(t),
                arg(0, f64::NAN),
                arg(1, ms_from_time(t)),
            ),
        ),
        Field::Milliseconds => make_date(
            day(t),
            make_time(
                hour_from_time(t),
                min_from_time(t),
                sec_from_time(t),
                arg(0, f64::NAN),
            ),
        ),
    };
    time_clip(value)
}

pub(crate) fn day_name(wd: f64) -> &'static str {
    match wd as i32 {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        _ => "Sat",
    }
}

pub(crate) fn day_name_long(wd: f64) -> &'static str {
    match wd as i32 {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Saturday",
    }
}

pub(crate) fn month_name(m: f64) -> &'static str {
    match m as i32 {
        0 => "Jan",
        1 => "Feb",
        2 => "Mar",
        3 => "Apr",
        4 => "May",
        5 => "Jun",
        6 => "Jul",
        7 => "Aug",
        8 => "Sep",
        9 => "Oct",
        10 => "Nov",
        _ => "Dec",
    }
}

pub(crate) fn month_name_long(m: f64) -> &'static str {
    match m as i32 {
        0 => "January",
        1 => "February",
        2 => "March",
        3 => "April",
        4 => "May",
        5 => "June",
        6 => "July",
        7 => "August",
        8 => "September",
        9 => "October",
        10 => "November",
        _ => "December",
    }
}

/// `YYYY-MM-DDTHH:mm:ss.sss` of a time value, without any zone designator.
/// Years outside 0..=9999 use the expanded `±YYYYYY` form.
pub(crate) fn iso_date_time(t: f64) -> String {
    let y = year_from_time(t) as i64;
    let year = if (0..=9999).contains(&y) {
        format!("{y:04}")
    } else if y >= 0 {
        format!("+{y:06}")
    } else {
        format!("-{:06}", y.unsigned_abs())
    };
    format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        year,
        month_from_time(t) as i32 + 1,
        date_from_time(t) as i32,
        hour_from_time(t) as i32,
        min_from_time(t) as i32,
        sec_from_time(t) as i32,
        ms_from_time(t) as i32
    )
}

/// RFC 7231 rendering, e.g. `"Tue, 11 Feb 2020 08:00:00 GMT"`.
pub(crate) fn utc_string(t: f64) -> String {
    format!(
        "{}, {:02} {} {} {} GMT",
        day_name(week_day(t)),
        date_from_time(t) as i32,
        month_name(month_from_time(t)),
        padded_year(t),
        clock_string(t)
    )
}

/// `"Tue Feb 11 2020"`.
pub(crate) fn date_string(t: f64) -> String {
    format!(
        "{} {} {:02} {}",
        day_name(week_day(t)),
        month_name(month_from_time(t)),
        date_from_time(t) as i32,
        padded_year(t)
    )
}

/// Year of `t` padded to four digits, with a leading `-` before year 0.
pub(crate) fn padded_year(t: f64) -> String {
    let y = year_from_time(t) as i64;
    if y < 0 {
        format!("-{:04}", y.unsigned_abs())
    } else {
        format!("{y:04}")
    }
}

/// `HH:mm:ss` of a time value.
pub(crate) fn clock_string(t: f64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        hour_from_time(t) as i32,
        min_from_time(t) as i32,
        sec_from_time(t) as i32
    )
}
