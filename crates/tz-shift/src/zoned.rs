//! The time-zone-shifted date value.
//!
//! A [`ZonedInstant`] stores an absolute instant and a time zone. Calendar
//! fields read and write as a clock in that zone would show them, while the
//! stored value stays a true UTC instant.
//!
//! Internally a second "shadow" time value holds the instant shifted by the
//! zone's current offset, so its UTC-domain fields are the zoned wall clock
//! fields. The shadow is recomputed after every change to the instant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::calendar::{
    clock_string, date_from_time, date_string, hour_from_time, iso_date_time, make_date,
    make_day, make_full_year, make_time, min_from_time, month_from_time, ms_from_time,
    now_ms, sec_from_time, set_utc_field, time_clip, utc_string, week_day, year_from_time,
    Field, MS_PER_MINUTE,
};
use crate::format::{tz_name, utc_datetime, ZoneNameStyle};
use crate::locale::{format_locale, LocaleOptions, Parts};
use crate::offset::{offset_at, resolve_wall};
use crate::parse::parse_instant;
use crate::value::TimeValue;

const INVALID_DATE: &str = "Invalid Date";

// ── Calendar fields ─────────────────────────────────────────────────────────

/// Explicit calendar components for construction.
///
/// `month` is zero-based. Values out of their natural range carry into the
/// next larger field, and years 0 through 99 mean 1900 through 1999.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateFields {
    pub year: f64,
    pub month: f64,
    pub day: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub milliseconds: f64,
}

impl DateFields {
    /// The first day of `month` in `year`, at midnight.
    pub fn new(year: f64, month: f64) -> Self {
        Self {
            year,
            month,
            day: 1.0,
            hours: 0.0,
            minutes: 0.0,
            seconds: 0.0,
            milliseconds: 0.0,
        }
    }

    pub fn day(mut self, day: f64) -> Self {
        self.day = day;
        self
    }

    pub fn hours(mut self, hours: f64) -> Self {
        self.hours = hours;
        self
    }

    pub fn minutes(mut self, minutes: f64) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn seconds(mut self, seconds: f64) -> Self {
        self.seconds = seconds;
        self
    }

    pub fn milliseconds(mut self, milliseconds: f64) -> Self {
        self.milliseconds = milliseconds;
        self
    }

    /// The fields read as a UTC-domain time value.
    fn wall(&self) -> f64 {
        time_clip(make_date(
            make_day(make_full_year(self.year), self.month, self.day),
            make_time(self.hours, self.minutes, self.seconds, self.milliseconds),
        ))
    }
}

// ── Accessor generation ─────────────────────────────────────────────────────

macro_rules! field_getters {
    ($($zoned:ident, $utc:ident => $extract:ident;)*) => {
        $(
            #[doc = concat!("Zoned-local `", stringify!($extract), "`, NaN if invalid.")]
            pub fn $zoned(&self) -> f64 {
                $extract(self.shadow)
            }

            #[doc = concat!("UTC-domain `", stringify!($extract), "`, NaN if invalid.")]
            pub fn $utc(&self) -> f64 {
                $extract(self.time)
            }
        )*
    };
}

macro_rules! field_setters {
    ($($field:ident: $zoned:ident, $utc:ident ($first:ident $(, $rest:ident)*);)*) => {
        $(
            #[doc = concat!(
                "Set `", stringify!($first), "` as a zoned wall clock value. ",
                "Returns the new time value."
            )]
            pub fn $zoned(&mut self, $first: f64 $(, $rest: Option<f64>)*) -> f64 {
                self.set_zoned(Field::$field, &[Some($first) $(, $rest)*])
            }

            #[doc = concat!(
                "Set `", stringify!($first), "` in the UTC domain, keeping the ",
                "wall clock stable across offset changes. Returns the new time value."
            )]
            pub fn $utc(&mut self, $first: f64 $(, $rest: Option<f64>)*) -> f64 {
                self.set_absolute(Field::$field, &[Some($first) $(, $rest)*])
            }
        )*
    };
}

// ── ZonedInstant ────────────────────────────────────────────────────────────

/// An absolute instant paired with the time zone its fields are read in.
///
/// `time_zone` is an IANA identifier, a fixed offset such as `"+05:30"`,
/// or `None` for the host zone. An invalid instant (bad input, or a zone
/// that does not resolve) has a NaN time value; every getter then returns
/// NaN and every formatter returns `"Invalid Date"`.
///
/// # Examples
///
/// ```
/// use tz_shift::{DateFields, ZonedInstant};
///
/// let mut date = ZonedInstant::from_fields(DateFields::new(2024.0, 1.0).day(11.0), "America/New_York");
/// assert_eq!(date.to_iso_string(), "2024-02-11T00:00:00.000-05:00");
///
/// date.set_hours(30.0, None, None, None);
/// assert_eq!(date.date(), 12.0);
/// assert_eq!(date.hours(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ZonedInstant {
    time: f64,
    time_zone: Option<String>,
    shadow: f64,
}

impl ZonedInstant {
    // ── Construction ──

    /// The current instant.
    pub fn now<'a>(time_zone: impl Into<Option<&'a str>>) -> Self {
        Self::from_timestamp(now_ms(), time_zone)
    }

    /// The instant denoted by any instant-like value.
    pub fn new<'a, T: TimeValue + ?Sized>(
        value: &T,
        time_zone: impl Into<Option<&'a str>>,
    ) -> Self {
        Self::from_timestamp(value.time_value(), time_zone)
    }

    /// The instant `ms` milliseconds after the Unix epoch.
    pub fn from_timestamp<'a>(ms: f64, time_zone: impl Into<Option<&'a str>>) -> Self {
        let mut date = Self {
            time: time_clip(ms),
            time_zone: time_zone.into().map(str::to_string),
            shadow: f64::NAN,
        };
        date.sync_to_shadow();
        date
    }

    /// The instant an instant string denotes; NaN-valued when unparsable.
    pub fn from_str_in<'a>(input: &str, time_zone: impl Into<Option<&'a str>>) -> Self {
        Self::from_timestamp(parse_instant(input), time_zone)
    }

    /// The instant at which clocks in `time_zone` show `fields`.
    ///
    /// Readings repeated by a fall-back transition resolve to the earlier
    /// instant; readings skipped by a spring-forward transition move
    /// forward by the skipped amount.
    pub fn from_fields<'a>(fields: DateFields, time_zone: impl Into<Option<&'a str>>) -> Self {
        let time_zone = time_zone.into();
        let time = resolve_wall(time_zone, fields.wall());
        Self::from_timestamp(time, time_zone)
    }

    /// Same instant, read in another zone.
    pub fn with_time_zone<'a>(&self, time_zone: impl Into<Option<&'a str>>) -> Self {
        Self::from_timestamp(self.time, time_zone)
    }

    /// Time value of `fields` read in UTC.
    pub fn utc(fields: &DateFields) -> f64 {
        fields.wall()
    }

    /// Time value of an instant string, NaN when unparsable.
    pub fn parse(input: &str) -> f64 {
        parse_instant(input)
    }

    // ── Instant ──

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn value_of(&self) -> f64 {
        self.time
    }

    /// Replace the absolute instant. A finite value revalidates an
    /// invalid instant (provided the zone resolves).
    pub fn set_time(&mut self, ms: f64) -> f64 {
        self.time = time_clip(ms);
        self.sync_to_shadow();
        self.time
    }

    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        !self.time.is_nan()
    }

    pub fn to_utc_datetime(&self) -> Option<DateTime<Utc>> {
        utc_datetime(self.time)
    }

    /// Minutes the zone is behind UTC, following the host convention
    /// (positive west of Greenwich).
    pub fn timezone_offset(&self) -> f64 {
        -self.offset() + 0.0
    }

    // ── Fields ──

    field_getters! {
        full_year, utc_full_year => year_from_time;
        month, utc_month => month_from_time;
        date, utc_date => date_from_time;
        day, utc_day => week_day;
        hours, utc_hours => hour_from_time;
        minutes, utc_minutes => min_from_time;
        seconds, utc_seconds => sec_from_time;
        milliseconds, utc_milliseconds => ms_from_time;
    }

    field_setters! {
        FullYear: set_full_year, set_utc_full_year(year, month, date);
        Month: set_month, set_utc_month(month, date);
        Date: set_date, set_utc_date(date);
        Hours: set_hours, set_utc_hours(hours, minutes, seconds, milliseconds);
        Minutes: set_minutes, set_utc_minutes(minutes, seconds, milliseconds);
        Seconds: set_seconds, set_utc_seconds(seconds, milliseconds);
        Milliseconds: set_milliseconds, set_utc_milliseconds(milliseconds);
    }

    // ── Formatting ──

    /// ISO 8601 with the zone's offset, e.g. `"2020-01-01T00:00:00.000+05:30"`.
    pub fn to_iso_string(&self) -> String {
        match self.offset_parts() {
            Some((sign, hours, minutes)) => {
                format!("{}{sign}{hours:02}:{minutes:02}", iso_date_time(self.shadow))
            }
            None => INVALID_DATE.to_string(),
        }
    }

    /// The ISO string, or `None` for an invalid instant.
    pub fn to_json(&self) -> Option<String> {
        self.is_valid_in_zone().then(|| self.to_iso_string())
    }

    /// `"Wed Jan 01 2020"`.
    pub fn to_date_string(&self) -> String {
        if !self.is_valid_in_zone() {
            return INVALID_DATE.to_string();
        }
        date_string(self.shadow)
    }

    /// `"00:00:00 GMT+0800 (Singapore Standard Time)"`.
    pub fn to_time_string(&self) -> String {
        let Some((sign, hours, minutes)) = self.offset_parts() else {
            return INVALID_DATE.to_string();
        };
        let name = tz_name(self.time_zone(), &self.time, ZoneNameStyle::Long);
        format!(
            "{} GMT{sign}{hours:02}{minutes:02} ({name})",
            clock_string(self.shadow)
        )
    }

    /// RFC 7231 in UTC, e.g. `"Tue, 11 Feb 2020 08:00:00 GMT"`.
    pub fn to_utc_string(&self) -> String {
        if !self.is_valid() {
            return INVALID_DATE.to_string();
        }
        utc_string(self.time)
    }

    pub fn to_locale_string(&self, options: &LocaleOptions) -> String {
        self.locale(options, Parts::DateTime)
    }

    pub fn to_locale_date_string(&self, options: &LocaleOptions) -> String {
        self.locale(options, Parts::Date)
    }

    pub fn to_locale_time_string(&self, options: &LocaleOptions) -> String {
        self.locale(options, Parts::Time)
    }

    // ── Internals ──

    fn offset(&self) -> f64 {
        offset_at(self.time_zone(), self.time)
    }

    fn is_valid_in_zone(&self) -> bool {
        self.is_valid() && !self.shadow.is_nan()
    }

    /// Offset sign, hours and minutes for rendering.
    fn offset_parts(&self) -> Option<(char, i64, i64)> {
        let offset = self.offset();
        if !self.is_valid_in_zone() || offset.is_nan() {
            return None;
        }
        let sign = if offset < 0.0 { '-' } else { '+' };
        let abs = offset.abs() as i64;
        Some((sign, abs / 60, abs % 60))
    }

    fn locale(&self, options: &LocaleOptions, parts: Parts) -> String {
        let zone = options.time_zone.as_deref().or(self.time_zone());
        format_locale(self.time, zone, options, parts)
    }

    /// Recompute the shadow from the instant. A zone that does not resolve
    /// invalidates the instant.
    ///
    /// The shadow is not clipped: at the edges of the time value range the
    /// wall clock may lie up to a day beyond them.
    fn sync_to_shadow(&mut self) {
        let offset = self.offset();
        if offset.is_nan() {
            self.time = f64::NAN;
            self.shadow = f64::NAN;
            return;
        }
        self.shadow = self.time + offset * MS_PER_MINUTE;
    }

    /// Write a wall clock field on the shadow, then find the instant that
    /// shows the new reading.
    fn set_zoned(&mut self, field: Field, args: &[Option<f64>]) -> f64 {
        let wall = set_utc_field(self.shadow, field, args);
        self.time = resolve_wall(self.time_zone(), wall);
        self.sync_to_shadow();
        self.time
    }

    /// Write a UTC-domain field on the instant. When the write moves the
    /// instant onto a different offset, shift back by the difference so
    /// the wall clock reading is kept.
    fn set_absolute(&mut self, field: Field, args: &[Option<f64>]) -> f64 {
        let before = self.offset();
        let mut time = set_utc_field(self.time, field, args);
        let after = offset_at(self.time_zone(), time);
        if before.is_finite() && after.is_finite() && before != after {
            time = time_clip(time - (after - before) * MS_PER_MINUTE);
        }
        self.time = time;
        self.sync_to_shadow();
        self.time
    }
}

impl TimeValue for ZonedInstant {
    fn time_value(&self) -> f64 {
        self.time
    }
}

/// Same as the host date's `toString`, e.g.
/// `"Wed Jan 01 2020 00:00:00 GMT+0800 (Singapore Standard Time)"`.
impl fmt::Display for ZonedInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid_in_zone() {
            return f.write_str(INVALID_DATE);
        }
        write!(f, "{} {}", self.to_date_string(), self.to_time_string())
    }
}

/// Serializes as the ISO string, or `null` when invalid.
impl Serialize for ZonedInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_json() {
            Some(iso) => serializer.serialize_str(&iso),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NY: &str = "America/New_York";
    const SG: &str = "Asia/Singapore";

    fn at(s: &str) -> f64 {
        parse_instant(s)
    }

    fn fields(y: f64, m: f64, d: f64) -> DateFields {
        DateFields::new(y, m).day(d)
    }

    // ── construction ──

    #[test]
    fn test_from_fields_in_zone() {
        let date = ZonedInstant::from_fields(
            fields(2024.0, 1.0, 11.0)
                .hours(12.0)
                .minutes(30.0)
                .seconds(45.0)
                .milliseconds(987.0),
            NY,
        );
        assert_eq!(date.to_iso_string(), "2024-02-11T12:30:45.987-05:00");
        assert_eq!(date.time(), at("2024-02-11T17:30:45.987Z"));
    }

    #[test]
    fn test_from_timestamp_in_zone() {
        let t = at("1987-02-11T00:00:00Z");
        assert_eq!(
            ZonedInstant::from_timestamp(t, SG).to_iso_string(),
            "1987-02-11T08:00:00.000+08:00"
        );
        assert_eq!(
            ZonedInstant::from_timestamp(t, NY).to_iso_string(),
            "1987-02-10T19:00:00.000-05:00"
        );
    }

    #[test]
    fn test_from_date_only_string_is_utc() {
        let date = ZonedInstant::from_str_in("2024-02-11", NY);
        assert_eq!(date.to_iso_string(), "2024-02-10T19:00:00.000-05:00");
    }

    #[test]
    fn test_new_from_instant_like_values() {
        let chrono = Utc::now();
        let date = ZonedInstant::new(&chrono, SG);
        assert_eq!(date.time(), chrono.timestamp_millis() as f64);

        let copy = ZonedInstant::new(&date, NY);
        assert_eq!(copy.time(), date.time());
        assert_eq!(copy.time_zone(), Some(NY));
    }

    #[test]
    fn test_from_fields_two_digit_year() {
        let date = ZonedInstant::from_fields(fields(99.0, 0.0, 1.0), "UTC");
        assert_eq!(date.full_year(), 1999.0);
    }

    #[test]
    fn test_from_fields_in_spring_forward_gap() {
        let gap = ZonedInstant::from_fields(fields(2020.0, 2.0, 8.0).hours(2.0), NY);
        assert_eq!(gap.time(), at("2020-03-08T07:00:00Z"));
        assert_eq!(gap.hours(), 3.0);

        let la = ZonedInstant::from_fields(fields(2020.0, 2.0, 8.0).hours(2.0), "America/Los_Angeles");
        assert_eq!(la.time(), at("2020-03-08T10:00:00Z"));
    }

    #[test]
    fn test_from_fields_in_fall_back_overlap() {
        let date = ZonedInstant::from_fields(fields(2020.0, 10.0, 1.0).hours(1.0).minutes(30.0), NY);
        assert_eq!(date.to_iso_string(), "2020-11-01T01:30:00.000-04:00");
    }

    #[test]
    fn test_from_fields_on_skipped_day() {
        let date = ZonedInstant::from_fields(fields(2011.0, 11.0, 30.0).hours(12.0), "Pacific/Apia");
        assert_eq!(date.to_iso_string(), "2011-12-31T12:00:00.000+14:00");
    }

    #[test]
    fn test_utc_static() {
        assert_eq!(
            ZonedInstant::utc(&fields(2020.0, 1.0, 11.0).hours(8.0)),
            at("2020-02-11T08:00:00Z")
        );
        assert_eq!(ZonedInstant::parse("2020-02-11T08:00:00Z"), at("2020-02-11T08:00:00Z"));
    }

    // ── invalid values ──

    #[test]
    fn test_invalid_timestamp_propagates() {
        let date = ZonedInstant::from_timestamp(f64::NAN, NY);
        assert!(!date.is_valid());
        assert!(date.full_year().is_nan());
        assert!(date.utc_hours().is_nan());
        assert!(date.timezone_offset().is_nan());
        assert_eq!(date.to_iso_string(), "Invalid Date");
        assert_eq!(date.to_string(), "Invalid Date");
        assert_eq!(date.to_utc_string(), "Invalid Date");
        assert_eq!(date.to_json(), None);
    }

    #[test]
    fn test_invalid_zone_propagates() {
        let date = ZonedInstant::from_timestamp(0.0, "Etc/Invalid");
        assert!(!date.is_valid());
        assert!(date.hours().is_nan());
        assert!(date.time().is_nan());
        assert_eq!(date.to_iso_string(), "Invalid Date");
        assert_eq!(date.to_date_string(), "Invalid Date");
        assert_eq!(date.to_time_string(), "Invalid Date");

        let date = ZonedInstant::from_fields(fields(2020.0, 0.0, 1.0), "Etc/Invalid");
        assert!(!date.is_valid());
    }

    #[test]
    fn test_instants_at_the_time_value_limits() {
        let max = ZonedInstant::from_timestamp(8.64e15, "UTC");
        assert!(max.is_valid());
        assert_eq!(max.to_iso_string(), "+275760-09-13T00:00:00.000+00:00");

        let min = ZonedInstant::from_timestamp(-8.64e15, "UTC");
        assert!(min.is_valid());
        assert_eq!(min.to_iso_string(), "-271821-04-20T00:00:00.000+00:00");

        let tokyo = ZonedInstant::from_timestamp(8.64e15, "Asia/Tokyo");
        assert_eq!(tokyo.to_iso_string(), "+275760-09-13T09:00:00.000+09:00");
        assert_eq!(tokyo.timezone_offset(), -540.0);

        let fixed = ZonedInstant::from_timestamp(-8.64e15, "+05:30");
        assert_eq!(fixed.hours(), 5.0);
        assert!(ZonedInstant::from_timestamp(8.64e15 + 1.0, "UTC").time().is_nan());
    }

    #[test]
    fn test_setter_revalidates() {
        let mut date = ZonedInstant::from_timestamp(f64::NAN, SG);
        assert!(date.set_hours(1.0, None, None, None).is_nan());
        date.set_full_year(2020.0, None, None);
        assert_eq!(date.to_iso_string(), "2020-01-01T00:00:00.000+08:00");

        let mut date = ZonedInstant::from_timestamp(f64::NAN, SG);
        date.set_time(at("2020-01-01T00:00:00Z"));
        assert!(date.is_valid());
    }

    // ── zoned setters ──

    fn sg_new_year() -> ZonedInstant {
        ZonedInstant::from_fields(fields(2020.0, 0.0, 1.0), SG)
    }

    #[test]
    fn test_set_full_year_overflow() {
        let mut date = ZonedInstant::from_fields(fields(2020.0, 0.0, 1.0), NY);
        date.set_full_year(2021.0, Some(15.0), Some(45.0));
        assert_eq!(date.to_iso_string(), "2022-05-15T00:00:00.000-04:00");

        let mut date = ZonedInstant::from_fields(fields(2020.0, 0.0, 1.0), NY);
        date.set_full_year(2021.0, Some(-15.0), Some(-150.0));
        assert_eq!(date.to_iso_string(), "2019-05-03T00:00:00.000-04:00");
    }

    #[test]
    fn test_set_month_overflow() {
        let mut date = sg_new_year();
        date.set_month(15.0, Some(45.0));
        assert_eq!(date.to_iso_string(), "2021-05-15T00:00:00.000+08:00");

        let mut date = sg_new_year();
        date.set_month(-15.0, Some(-150.0));
        assert_eq!(date.to_iso_string(), "2018-05-03T00:00:00.000+08:00");
    }

    #[test]
    fn test_set_date_overflow() {
        let mut date = sg_new_year();
        date.set_date(32.0);
        assert_eq!(date.to_iso_string(), "2020-02-01T00:00:00.000+08:00");
        date.set_date(0.0);
        assert_eq!(date.to_iso_string(), "2020-01-31T00:00:00.000+08:00");
    }

    #[test]
    fn test_set_hours_overflow() {
        let mut date = sg_new_year();
        date.set_hours(30.0, Some(120.0), Some(120.0), Some(30000.0));
        assert_eq!(date.to_iso_string(), "2020-01-02T08:02:30.000+08:00");

        let mut date = sg_new_year();
        date.set_hours(-30.0, Some(-120.0), Some(-120.0), Some(-30000.0));
        assert_eq!(date.to_iso_string(), "2019-12-30T15:57:30.000+08:00");
    }

    #[test]
    fn test_set_minutes_seconds_milliseconds() {
        let mut date = sg_new_year();
        date.set_minutes(90.0, Some(30.0), None);
        assert_eq!(date.to_iso_string(), "2020-01-01T01:30:30.000+08:00");
        date.set_seconds(-1.0, None);
        assert_eq!(date.to_iso_string(), "2020-01-01T01:29:59.000+08:00");
        date.set_milliseconds(1500.0);
        assert_eq!(date.to_iso_string(), "2020-01-01T01:30:00.500+08:00");
    }

    #[test]
    fn test_zoned_setter_across_dst_keeps_wall_clock() {
        let mut date = ZonedInstant::from_fields(fields(2020.0, 2.0, 7.0).hours(12.0), NY);
        date.set_date(9.0);
        assert_eq!(date.to_iso_string(), "2020-03-09T12:00:00.000-04:00");
        assert_eq!(date.hours(), 12.0);
    }

    #[test]
    fn test_zoned_setter_into_gap_moves_forward() {
        let mut date = ZonedInstant::from_fields(fields(2020.0, 2.0, 8.0), NY);
        date.set_hours(2.0, Some(30.0), None, None);
        assert_eq!(date.to_iso_string(), "2020-03-08T03:30:00.000-04:00");
    }

    // ── UTC setters ──

    #[test]
    fn test_set_utc_full_year_overflow() {
        let mut date = sg_new_year();
        date.set_utc_full_year(2020.0, Some(14.0), Some(45.0));
        assert_eq!(date.time(), at("2021-04-14T16:00:00Z"));
        assert_eq!(date.date(), 15.0);
    }

    #[test]
    fn test_set_utc_month_overflow() {
        let mut date = sg_new_year();
        // The UTC year is still 2019; "Feb 31" carries into March.
        date.set_utc_month(1.0, None);
        assert_eq!(date.time(), at("2019-03-03T16:00:00Z"));
    }

    #[test]
    fn test_set_utc_hours_across_dst_keeps_wall_clock() {
        let mut date = ZonedInstant::from_fields(fields(2023.0, 2.0, 12.0), NY);
        let naive = at("2023-03-12T08:30:00Z");
        let corrected = date.set_utc_hours(8.0, Some(30.0), None, None);
        assert_eq!(naive - corrected, 3_600_000.0);
        assert_eq!(date.hours(), 3.0);
        assert_eq!(date.minutes(), 30.0);
    }

    #[test]
    fn test_set_utc_date_across_dst() {
        let mut date = ZonedInstant::from_fields(fields(2020.0, 2.0, 7.0).hours(12.0), NY);
        date.set_utc_date(9.0);
        assert_eq!(date.time(), at("2020-03-09T16:00:00Z"));
        assert_eq!(date.hours(), 12.0);
    }

    #[test]
    fn test_set_utc_without_offset_change() {
        let mut date = sg_new_year();
        date.set_utc_hours(0.0, None, None, None);
        assert_eq!(date.time(), at("2019-12-31T00:00:00Z"));
        assert_eq!(date.hours(), 8.0);
    }

    // ── getters ──

    #[test]
    fn test_zoned_and_utc_getters() {
        let date = ZonedInstant::from_timestamp(at("2020-01-01T20:15:30.250Z"), SG);
        assert_eq!(date.full_year(), 2020.0);
        assert_eq!(date.month(), 0.0);
        assert_eq!(date.date(), 2.0);
        assert_eq!(date.day(), 4.0);
        assert_eq!(date.hours(), 4.0);
        assert_eq!(date.minutes(), 15.0);
        assert_eq!(date.seconds(), 30.0);
        assert_eq!(date.milliseconds(), 250.0);
        assert_eq!(date.utc_date(), 1.0);
        assert_eq!(date.utc_day(), 3.0);
        assert_eq!(date.utc_hours(), 20.0);
    }

    // ── zones ──

    #[test]
    fn test_timezone_offset() {
        let t = at("2020-01-15T00:00:00Z");
        assert_eq!(ZonedInstant::from_timestamp(t, NY).timezone_offset(), 300.0);
        assert_eq!(ZonedInstant::from_timestamp(t, SG).timezone_offset(), -480.0);
        let utc = ZonedInstant::from_timestamp(t, "UTC").timezone_offset();
        assert_eq!(utc, 0.0);
        assert!(utc.is_sign_positive());
    }

    #[test]
    fn test_with_time_zone() {
        let date = ZonedInstant::from_timestamp(at("1987-02-11T00:00:00Z"), SG);
        let tokyo = date.with_time_zone("Asia/Tokyo");
        assert_eq!(tokyo.to_iso_string(), "1987-02-11T09:00:00.000+09:00");
        assert_eq!(date.time_zone(), Some(SG));
        assert_eq!(tokyo.time(), date.time());
    }

    #[test]
    fn test_fixed_offset_zone() {
        let date = ZonedInstant::from_timestamp(at("2020-01-01T00:00:00Z"), "-02:30");
        assert_eq!(date.to_iso_string(), "2019-12-31T21:30:00.000-02:30");
    }

    // ── formatting ──

    #[test]
    fn test_iso_string_fractional_offsets() {
        let kolkata = ZonedInstant::from_fields(fields(2020.0, 0.0, 1.0), "Asia/Kolkata");
        assert_eq!(kolkata.to_iso_string(), "2020-01-01T00:00:00.000+05:30");
        let pyongyang = ZonedInstant::from_fields(fields(2015.0, 8.0, 1.0), "Asia/Pyongyang");
        assert_eq!(pyongyang.to_iso_string(), "2015-09-01T00:00:00.000+08:30");
    }

    #[test]
    fn test_display_format() {
        assert_eq!(
            sg_new_year().to_string(),
            "Wed Jan 01 2020 00:00:00 GMT+0800 (Singapore Standard Time)"
        );
        let ny = ZonedInstant::from_fields(fields(2020.0, 5.0, 1.0), NY);
        assert_eq!(ny.to_string(), "Mon Jun 01 2020 00:00:00 GMT-0400 (Eastern Daylight Time)");
        assert_eq!(ny.to_date_string(), "Mon Jun 01 2020");
        assert_eq!(ny.to_time_string(), "00:00:00 GMT-0400 (Eastern Daylight Time)");
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        let date = ZonedInstant::from_fields(fields(2020.0, 5.0, 1.0).hours(13.0), NY);
        assert_eq!(parse_instant(&date.to_string()), date.time());
    }

    #[test]
    fn test_utc_string() {
        let date = ZonedInstant::from_fields(fields(2020.0, 1.0, 11.0).hours(16.0), SG);
        assert_eq!(date.to_utc_string(), "Tue, 11 Feb 2020 08:00:00 GMT");
    }

    #[test]
    fn test_json() {
        let date = sg_new_year();
        assert_eq!(date.to_json().as_deref(), Some("2020-01-01T00:00:00.000+08:00"));
        assert_eq!(
            serde_json::to_string(&date).unwrap(),
            "\"2020-01-01T00:00:00.000+08:00\""
        );
        let invalid = ZonedInstant::from_timestamp(f64::NAN, SG);
        assert_eq!(serde_json::to_string(&invalid).unwrap(), "null");
    }

    #[test]
    fn test_locale_strings_use_instance_zone() {
        let date = sg_new_year();
        let options = LocaleOptions::new();
        assert_eq!(date.to_locale_string(&options), "1/1/2020, 12:00:00 AM");
        assert_eq!(date.to_locale_date_string(&options), "1/1/2020");
        assert_eq!(date.to_locale_time_string(&options), "12:00:00 AM");
    }

    #[test]
    fn test_locale_zone_override() {
        let date = sg_new_year();
        let options = LocaleOptions::new().time_zone(NY);
        assert_eq!(date.to_locale_string(&options), "12/31/2019, 11:00:00 AM");
    }

    #[test]
    fn test_chrono_conversion() {
        let date = sg_new_year();
        assert_eq!(
            date.to_utc_datetime().map(|dt| dt.to_rfc3339()),
            Some("2019-12-31T16:00:00+00:00".to_string())
        );
        assert_eq!(ZonedInstant::from_timestamp(f64::NAN, SG).to_utc_datetime(), None);
    }
}
