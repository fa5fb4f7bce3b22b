//! Offset transition scanning.
//!
//! Transitions are rare compared to the ranges callers ask about, so the
//! scan walks month by month and only narrows to days, then hours, inside
//! a month whose end offset differs from its start offset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::calendar::{
    date_from_time, hour_from_time, month_from_time, set_utc_field, Field, MS_PER_HOUR,
};
use crate::error::{Result, TzError};
use crate::format::utc_datetime;
use crate::offset::offset_at;
use crate::value::TimeValue;

/// A half-open range of instants, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Build an interval from two instant strings.
    ///
    /// # Errors
    ///
    /// Returns `TzError::InvalidDatetime` if either string does not parse.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let instant = |s: &str| {
            utc_datetime(s.time_value())
                .ok_or_else(|| TzError::InvalidDatetime(s.to_string()))
        };
        Ok(Self::new(instant(start)?, instant(end)?))
    }
}

/// An offset change: from `date` on, the zone is `offset` minutes east of
/// UTC, which is `change` minutes more than just before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TzChange {
    /// The first whole UTC hour probed at the new offset. Transitions on
    /// the hour are reported exactly; a change at 05:30 shows as 06:00.
    pub date: DateTime<Utc>,
    pub change: i32,
    pub offset: i32,
}

/// Every offset change of `time_zone` within `interval`, in order.
///
/// Both interval ends are truncated to the minute. Changes are found at the
/// resolution of whole UTC hours. Two changes that cancel out between the
/// same pair of month or day probes are not seen.
///
/// # Errors
///
/// Returns `TzError::InvalidTimezone` if the zone does not resolve at the
/// start of the interval.
///
/// # Examples
///
/// ```
/// use tz_shift::{scan, Interval};
///
/// let interval = Interval::parse("2020-01-01T00:00:00Z", "2021-01-01T00:00:00Z").unwrap();
/// let changes = scan("America/New_York", &interval).unwrap();
/// assert_eq!(changes.len(), 2);
/// assert_eq!(changes[0].change, 60);
/// assert_eq!(changes[0].offset, -240);
/// ```
pub fn scan(time_zone: &str, interval: &Interval) -> Result<Vec<TzChange>> {
    let start = truncate_to_minute(interval.start.time_value());
    let end = truncate_to_minute(interval.end.time_value());
    let offset = |t: f64| offset_at(Some(time_zone), t);

    if offset(start).is_nan() {
        return Err(TzError::InvalidTimezone(time_zone.to_string()));
    }
    debug!(time_zone, start = %interval.start, end = %interval.end, "scanning offsets");

    let changes = walk(start, end, offset);
    for change in &changes {
        trace!(
            time_zone,
            date = %change.date,
            change = change.change,
            offset = change.offset,
            "offset change"
        );
    }
    debug!(time_zone, count = changes.len(), "scan finished");
    Ok(changes)
}

/// Month, then day, then hour narrowing over `[start, end)` for any offset
/// function.
fn walk(start: f64, end: f64, offset: impl Fn(f64) -> f64) -> Vec<TzChange> {
    let mut changes = Vec::new();
    let mut last = offset(start);
    let mut month = start;
    while month < end {
        let previous = month;
        month = step(month, Field::Month);
        let month_offset = offset(month);
        if month_offset != last {
            scan_days(&offset, previous, month, &mut changes);
        }
        last = month_offset;
    }

    changes.retain(|c: &TzChange| {
        let t = c.date.time_value();
        start <= t && t < end
    });
    changes
}

fn scan_days(offset: &impl Fn(f64) -> f64, from: f64, to: f64, changes: &mut Vec<TzChange>) {
    let mut last = offset(from);
    let mut day = from;
    while day < to {
        let previous = day;
        day = step(day, Field::Date);
        let day_offset = offset(day);
        if day_offset != last {
            scan_hours(offset, previous, day, changes);
        }
        last = day_offset;
    }
}

/// Probes whole UTC hours after `from`, then `to` itself.
fn scan_hours(offset: &impl Fn(f64) -> f64, from: f64, to: f64, changes: &mut Vec<TzChange>) {
    let mut last = offset(from);
    let mut hour = (from / MS_PER_HOUR).floor() * MS_PER_HOUR;
    while hour < to {
        hour = step(hour, Field::Hours).min(to);
        let hour_offset = offset(hour);
        if hour_offset != last && hour_offset.is_finite() && last.is_finite() {
            if let Some(date) = utc_datetime(hour) {
                changes.push(TzChange {
                    date,
                    change: (hour_offset - last) as i32,
                    offset: hour_offset as i32,
                });
            }
        }
        last = hour_offset;
    }
}

/// Advance `t` by one unit of `field`, with native overflow.
fn step(t: f64, field: Field) -> f64 {
    let current = match field {
        Field::Month => month_from_time(t),
        Field::Date => date_from_time(t),
        _ => hour_from_time(t),
    };
    set_utc_field(t, field, &[Some(current + 1.0)])
}

fn truncate_to_minute(t: f64) -> f64 {
    set_utc_field(t, Field::Seconds, &[Some(0.0), Some(0.0)])
}
