//! Locale-aware rendering of instants.
//!
//! Two locales are built in, `en-US` (the default) and `en-GB`. Unknown
//! locale tags resolve to the default.

use serde::{Deserialize, Serialize};

use crate::calendar::{
    date_from_time, day_name_long, hour_from_time, min_from_time, month_from_time,
    month_name, month_name_long, sec_from_time, week_day, year_from_time, MS_PER_MINUTE,
};
use crate::format::{tz_name, ZoneNameStyle};
use crate::offset::offset_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// "Wednesday, January 1, 2020"
    Full,
    /// "January 1, 2020"
    Long,
    /// "Jan 1, 2020"
    Medium,
    /// "1/1/20"
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStyle {
    /// "12:00:00 AM Singapore Standard Time"
    Full,
    /// "12:00:00 AM GMT+8"
    Long,
    /// "12:00:00 AM"
    Medium,
    /// "12:00 AM"
    Short,
}

/// Options for the `to_locale_*` family.
///
/// `time_zone` overrides the zone of the instant being formatted. With
/// neither style set, dates and times render in the numeric form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleOptions {
    pub locale: Option<String>,
    pub time_zone: Option<String>,
    pub date_style: Option<DateStyle>,
    pub time_style: Option<TimeStyle>,
}

impl LocaleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn date_style(mut self, style: DateStyle) -> Self {
        self.date_style = Some(style);
        self
    }

    pub fn time_style(mut self, style: TimeStyle) -> Self {
        self.time_style = Some(style);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Parts {
    DateTime,
    Date,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Locale {
    EnUs,
    EnGb,
}

impl Locale {
    fn resolve(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) if tag.eq_ignore_ascii_case("en-GB") => Locale::EnGb,
            _ => Locale::EnUs,
        }
    }
}

/// Wall clock fields of an instant in one zone.
struct Fields {
    year: i64,
    month: usize,
    date: u32,
    weekday: f64,
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl Fields {
    fn from_wall(wall: f64) -> Self {
        Self {
            year: year_from_time(wall) as i64,
            month: month_from_time(wall) as usize,
            date: date_from_time(wall) as u32,
            weekday: week_day(wall),
            hours: hour_from_time(wall) as u32,
            minutes: min_from_time(wall) as u32,
            seconds: sec_from_time(wall) as u32,
        }
    }
}

/// Render `time` as seen in `time_zone`; `"Invalid Date"` when either does
/// not resolve.
pub(crate) fn format_locale(
    time: f64,
    time_zone: Option<&str>,
    options: &LocaleOptions,
    parts: Parts,
) -> String {
    let offset = offset_at(time_zone, time);
    if time.is_nan() || offset.is_nan() {
        return "Invalid Date".to_string();
    }
    let fields = Fields::from_wall(time + offset * MS_PER_MINUTE);
    let locale = Locale::resolve(options.locale.as_deref());

    let (date_style, time_style) = match parts {
        Parts::Date => (Some(options.date_style), None),
        Parts::Time => (None, Some(options.time_style)),
        Parts::DateTime if options.date_style.is_none() && options.time_style.is_none() => {
            (Some(None), Some(None))
        }
        Parts::DateTime => (
            options.date_style.map(Some),
            options.time_style.map(Some),
        ),
    };
    let zone_name = |style: ZoneNameStyle| tz_name(time_zone, &time, style);

    let date = date_style.map(|style| format_date(locale, &fields, style));
    let clock = time_style.map(|style| format_time(locale, &fields, style, zone_name));
    match (date, clock) {
        (Some(date), Some(clock)) => {
            let joiner = match options.date_style {
                Some(DateStyle::Full | DateStyle::Long) => " at ",
                _ => ", ",
            };
            format!("{date}{joiner}{clock}")
        }
        (Some(date), None) => date,
        (None, Some(clock)) => clock,
        (None, None) => String::new(),
    }
}

fn format_date(locale: Locale, f: &Fields, style: Option<DateStyle>) -> String {
    let month = f.month as f64;
    match (locale, style) {
        (Locale::EnUs, None) => format!("{}/{}/{}", f.month + 1, f.date, f.year),
        (Locale::EnUs, Some(DateStyle::Full)) => format!(
            "{}, {} {}, {}",
            day_name_long(f.weekday),
            month_name_long(month),
            f.date,
            f.year
        ),
        (Locale::EnUs, Some(DateStyle::Long)) => {
            format!("{} {}, {}", month_name_long(month), f.date, f.year)
        }
        (Locale::EnUs, Some(DateStyle::Medium)) => {
            format!("{} {}, {}", month_name(month), f.date, f.year)
        }
        (Locale::EnUs, Some(DateStyle::Short)) => {
            format!("{}/{}/{:02}", f.month + 1, f.date, f.year.rem_euclid(100))
        }
        (Locale::EnGb, None | Some(DateStyle::Short)) => {
            format!("{:02}/{:02}/{}", f.date, f.month + 1, f.year)
        }
        (Locale::EnGb, Some(DateStyle::Full)) => format!(
            "{} {} {} {}",
            day_name_long(f.weekday),
            f.date,
            month_name_long(month),
            f.year
        ),
        (Locale::EnGb, Some(DateStyle::Long)) => {
            format!("{} {} {}", f.date, month_name_long(month), f.year)
        }
        (Locale::EnGb, Some(DateStyle::Medium)) => {
            format!("{} {} {}", f.date, month_name(month), f.year)
        }
    }
}

fn format_time(
    locale: Locale,
    f: &Fields,
    style: Option<TimeStyle>,
    zone_name: impl Fn(ZoneNameStyle) -> String,
) -> String {
    let with_seconds = !matches!(style, Some(TimeStyle::Short));
    let clock = match locale {
        Locale::EnUs => {
            let hour = match f.hours % 12 {
                0 => 12,
                h => h,
            };
            let meridiem = if f.hours < 12 { "AM" } else { "PM" };
            if with_seconds {
                format!("{hour}:{:02}:{:02} {meridiem}", f.minutes, f.seconds)
            } else {
                format!("{hour}:{:02} {meridiem}", f.minutes)
            }
        }
        Locale::EnGb => {
            if with_seconds {
                format!("{:02}:{:02}:{:02}", f.hours, f.minutes, f.seconds)
            } else {
                format!("{:02}:{:02}", f.hours, f.minutes)
            }
        }
    };
    match style {
        Some(TimeStyle::Full) => format!("{clock} {}", zone_name(ZoneNameStyle::Long)),
        Some(TimeStyle::Long) => format!("{clock} {}", zone_name(ZoneNameStyle::Short)),
        _ => clock,
    }
}
