//! Zone formatters and time zone display names.
//!
//! [`ZoneFormat`] is the seam between this crate and whatever knows the
//! IANA database. [`TzdbFormat`] answers from `chrono-tz`; [`LocalFormat`]
//! answers for the host zone through `chrono::Local`. The offset resolver
//! and [`tz_name`] only talk to the trait.

use std::fmt;

use chrono::{DateTime, Local, Offset, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TzError};
use crate::offset::{formatter, offset_at};
use crate::value::TimeValue;

// ── Styles ──────────────────────────────────────────────────────────────────

/// Display style for a time zone name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneNameStyle {
    /// "EST", "GMT+8"
    Short,
    /// "Eastern Standard Time", "GMT+08:00"
    #[default]
    Long,
    /// "ET", "Singapore Time"
    ShortGeneric,
    /// "Eastern Time", "Singapore Standard Time"
    LongGeneric,
}

// ── Formatter seam ──────────────────────────────────────────────────────────

/// A compiled formatter for one time zone.
///
/// Implementations must be shareable across threads; the resolver keeps
/// them in a process-wide cache.
pub trait ZoneFormat: Send + Sync + fmt::Debug {
    /// Identifier of the zone this formatter renders.
    fn time_zone(&self) -> &str;

    /// The wall clock at `time`, as a UTC-domain time value.
    ///
    /// Returns `None` when `time` is not representable.
    fn wall_clock(&self, time: f64) -> Option<f64>;

    /// The offset-revealing rendering of `time`, e.g. `"GMT+05:45"`.
    ///
    /// # Errors
    ///
    /// Returns `TzError::UnsupportedStyle` when the formatter cannot render
    /// offsets; callers then fall back to [`ZoneFormat::wall_clock`].
    fn long_offset(&self, _time: f64) -> Result<String> {
        Err(TzError::UnsupportedStyle("longOffset".to_string()))
    }

    /// The display name of the zone at `time`, when one is known.
    fn zone_name(&self, time: f64, style: ZoneNameStyle) -> Option<String>;
}

/// Formatter backed by the tz database bundled with `chrono-tz`.
#[derive(Debug, Clone)]
pub struct TzdbFormat {
    tz: Tz,
}

impl TzdbFormat {
    /// Compile a formatter for an IANA identifier.
    ///
    /// # Errors
    ///
    /// Returns `TzError::InvalidTimezone` if the identifier is not in the
    /// database.
    pub fn new(time_zone: &str) -> Result<Self> {
        time_zone
            .parse::<Tz>()
            .map(|tz| Self { tz })
            .map_err(|_| TzError::InvalidTimezone(time_zone.to_string()))
    }

    fn local(&self, time: f64) -> Option<DateTime<Tz>> {
        nearest_datetime(time).map(|dt| dt.with_timezone(&self.tz))
    }
}

impl ZoneFormat for TzdbFormat {
    fn time_zone(&self) -> &str {
        self.tz.name()
    }

    fn wall_clock(&self, time: f64) -> Option<f64> {
        let dt = self.local(time)?;
        Some(time + f64::from(dt.offset().fix().local_minus_utc()) * 1_000.0)
    }

    fn long_offset(&self, time: f64) -> Result<String> {
        let dt = self
            .local(time)
            .ok_or_else(|| TzError::InvalidDatetime(format!("time value {time}")))?;
        Ok(format_long_offset_seconds(dt.offset().fix().local_minus_utc()))
    }

    fn zone_name(&self, time: f64, style: ZoneNameStyle) -> Option<String> {
        let dt = self.local(time)?;
        let offset = dt.offset();
        let minutes = offset.fix().local_minus_utc() / 60;
        let Some(names) = metazone(self.tz.name()) else {
            return Some(offset_name(minutes, style));
        };
        let daylight = offset.dst_offset().num_seconds() != 0;
        let name = match style {
            ZoneNameStyle::Long if daylight => names.daylight.to_string(),
            ZoneNameStyle::Long => names.standard.to_string(),
            ZoneNameStyle::LongGeneric => names.generic.to_string(),
            ZoneNameStyle::Short if names.abbreviated => dt.format("%Z").to_string(),
            ZoneNameStyle::Short => format_short_offset(minutes),
            ZoneNameStyle::ShortGeneric => names
                .short_generic
                .map(str::to_string)
                .unwrap_or_else(|| format_short_offset(minutes)),
        };
        Some(name)
    }
}

/// Formatter for the host's local zone.
#[derive(Debug, Clone)]
pub struct LocalFormat {
    name: String,
}

impl LocalFormat {
    pub fn new() -> Self {
        let name = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
        Self { name }
    }
}

impl Default for LocalFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneFormat for LocalFormat {
    fn time_zone(&self) -> &str {
        &self.name
    }

    fn wall_clock(&self, time: f64) -> Option<f64> {
        let utc = nearest_datetime(time)?;
        let offset = Local.offset_from_utc_datetime(&utc.naive_utc());
        Some(time + f64::from(offset.fix().local_minus_utc()) * 1_000.0)
    }

    fn zone_name(&self, time: f64, style: ZoneNameStyle) -> Option<String> {
        TzdbFormat::new(&self.name)
            .ok()
            .and_then(|fmt| fmt.zone_name(time, style))
    }
}

// ── Names ───────────────────────────────────────────────────────────────────

/// Display name of `time_zone` at `date` in the given style.
///
/// Zones with a well-known metazone get its names ("Eastern Standard Time",
/// "ET"); everything else, including fixed-offset identifiers, is named by
/// its offset ("GMT+8", "GMT+08:00"). Returns an empty string when the
/// zone or the instant cannot be resolved.
///
/// # Examples
///
/// ```
/// use tz_shift::{tz_name, ZoneNameStyle};
///
/// let date = "2024-01-15T12:00:00Z";
/// assert_eq!(tz_name(Some("America/New_York"), date, ZoneNameStyle::Short), "EST");
/// assert_eq!(tz_name(Some("Asia/Singapore"), date, ZoneNameStyle::Short), "GMT+8");
/// ```
pub fn tz_name<T: TimeValue + ?Sized>(
    time_zone: Option<&str>,
    date: &T,
    style: ZoneNameStyle,
) -> String {
    let time = date.time_value();
    if time.is_nan() {
        return String::new();
    }
    let named = formatter(time_zone)
        .ok()
        .and_then(|fmt| fmt.zone_name(time, style));
    if let Some(name) = named {
        return name;
    }
    let minutes = offset_at(time_zone, time);
    if minutes.is_nan() {
        return String::new();
    }
    offset_name(minutes as i32, style)
}

fn offset_name(minutes: i32, style: ZoneNameStyle) -> String {
    match style {
        ZoneNameStyle::Long | ZoneNameStyle::LongGeneric => format_long_offset(minutes),
        ZoneNameStyle::Short | ZoneNameStyle::ShortGeneric => format_short_offset(minutes),
    }
}

/// `"GMT+8"`, `"GMT-9:30"`, or `"GMT"` for zero.
pub(crate) fn format_short_offset(minutes: i32) -> String {
    if minutes == 0 {
        return "GMT".to_string();
    }
    let sign = if minutes < 0 { '-' } else { '+' };
    let (h, m) = (minutes.abs() / 60, minutes.abs() % 60);
    if m == 0 {
        format!("GMT{sign}{h}")
    } else {
        format!("GMT{sign}{h}:{m:02}")
    }
}

/// `"GMT+08:00"`, `"GMT-09:30"`, or `"GMT"` for zero.
pub(crate) fn format_long_offset(minutes: i32) -> String {
    format_long_offset_seconds(minutes * 60)
}

fn format_long_offset_seconds(seconds: i32) -> String {
    if seconds == 0 {
        return "GMT".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.abs();
    let (h, m, s) = (abs / 3600, abs % 3600 / 60, abs % 60);
    if s == 0 {
        format!("GMT{sign}{h:02}:{m:02}")
    } else {
        format!("GMT{sign}{h:02}:{m:02}:{s:02}")
    }
}

pub(crate) fn utc_datetime(time: f64) -> Option<DateTime<Utc>> {
    if !time.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(time as i64)
}

/// Like [`utc_datetime`], but instants past chrono's range (the outer few
/// thousand years of the time value range) snap to its nearest end. Offsets
/// there are read at that end.
fn nearest_datetime(time: f64) -> Option<DateTime<Utc>> {
    if !time.is_finite() {
        return None;
    }
    let min = DateTime::<Utc>::MIN_UTC.timestamp_millis();
    let max = DateTime::<Utc>::MAX_UTC.timestamp_millis();
    DateTime::from_timestamp_millis((time as i64).clamp(min, max))
}

struct Metazone {
    standard: &'static str,
    daylight: &'static str,
    generic: &'static str,
    short_generic: Option<&'static str>,
    /// Short names come from the tz database abbreviation ("EST", "PDT").
    abbreviated: bool,
}

const fn names(
    standard: &'static str,
    daylight: &'static str,
    generic: &'static str,
    short_generic: Option<&'static str>,
    abbreviated: bool,
) -> Metazone {
    Metazone {
        standard,
        daylight,
        generic,
        short_generic,
        abbreviated,
    }
}

fn metazone(id: &str) -> Option<Metazone> {
    let zone = match id {
        "America/New_York" | "America/Detroit" | "America/Toronto" | "America/Nassau"
        | "America/Indiana/Indianapolis" | "America/Indianapolis"
        | "America/Kentucky/Louisville" | "America/Louisville" | "US/Eastern"
        | "US/Michigan" | "EST5EDT" | "Canada/Eastern" => names(
            "Eastern Standard Time",
            "Eastern Daylight Time",
            "Eastern Time",
            Some("ET"),
            true,
        ),
        "America/Chicago" | "America/Winnipeg" | "America/Indiana/Knox"
        | "America/Menominee" | "US/Central" | "CST6CDT" | "Canada/Central" => names(
            "Central Standard Time",
            "Central Daylight Time",
            "Central Time",
            Some("CT"),
            true,
        ),
        "America/Denver" | "America/Boise" | "America/Edmonton" | "America/Phoenix"
        | "US/Mountain" | "US/Arizona" | "MST7MDT" | "Canada/Mountain" => names(
            "Mountain Standard Time",
            "Mountain Daylight Time",
            "Mountain Time",
            Some("MT"),
            true,
        ),
        "America/Los_Angeles" | "America/Vancouver" | "America/Tijuana" | "US/Pacific"
        | "PST8PDT" | "Canada/Pacific" => names(
            "Pacific Standard Time",
            "Pacific Daylight Time",
            "Pacific Time",
            Some("PT"),
            true,
        ),
        "America/Anchorage" | "America/Juneau" | "America/Sitka" | "America/Nome"
        | "US/Alaska" => names(
            "Alaska Standard Time",
            "Alaska Daylight Time",
            "Alaska Time",
            Some("AKT"),
            true,
        ),
        "Pacific/Honolulu" | "America/Adak" | "US/Hawaii" | "US/Aleutian" => names(
            "Hawaii-Aleutian Standard Time",
            "Hawaii-Aleutian Daylight Time",
            "Hawaii-Aleutian Time",
            Some("HST"),
            true,
        ),
        "America/Halifax" | "America/Moncton" | "Atlantic/Bermuda" | "Canada/Atlantic" => {
            names(
                "Atlantic Standard Time",
                "Atlantic Daylight Time",
                "Atlantic Time",
                Some("AT"),
                true,
            )
        }
        "America/St_Johns" | "Canada/Newfoundland" => names(
            "Newfoundland Standard Time",
            "Newfoundland Daylight Time",
            "Newfoundland Time",
            None,
            false,
        ),
        "UTC" | "Etc/UTC" | "Etc/UCT" | "Etc/Universal" | "Etc/Zulu" | "UCT" | "Universal"
        | "Zulu" => names(
            "Coordinated Universal Time",
            "Coordinated Universal Time",
            "Coordinated Universal Time",
            Some("UTC"),
            true,
        ),
        "Europe/London" | "GB" | "Europe/Belfast" => names(
            "Greenwich Mean Time",
            "British Summer Time",
            "United Kingdom Time",
            Some("United Kingdom Time"),
            false,
        ),
        "Europe/Paris" | "Europe/Berlin" | "Europe/Madrid" | "Europe/Rome"
        | "Europe/Amsterdam" | "Europe/Brussels" | "Europe/Vienna" | "Europe/Zurich"
        | "Europe/Stockholm" | "Europe/Oslo" | "Europe/Copenhagen" | "Europe/Prague"
        | "Europe/Warsaw" | "Europe/Budapest" | "Europe/Belgrade" | "CET" => names(
            "Central European Standard Time",
            "Central European Summer Time",
            "Central European Time",
            None,
            false,
        ),
        "Europe/Athens" | "Europe/Helsinki" | "Europe/Kiev" | "Europe/Kyiv"
        | "Europe/Bucharest" | "Europe/Sofia" | "Europe/Riga" | "Europe/Vilnius"
        | "Europe/Tallinn" | "EET" => names(
            "Eastern European Standard Time",
            "Eastern European Summer Time",
            "Eastern European Time",
            None,
            false,
        ),
        "Europe/Lisbon" | "Portugal" | "Atlantic/Canary" | "WET" => names(
            "Western European Standard Time",
            "Western European Summer Time",
            "Western European Time",
            None,
            false,
        ),
        "Europe/Moscow" | "W-SU" => names(
            "Moscow Standard Time",
            "Moscow Summer Time",
            "Moscow Time",
            None,
            false,
        ),
        "Asia/Kolkata" | "Asia/Calcutta" => names(
            "India Standard Time",
            "India Standard Time",
            "India Standard Time",
            Some("India Time"),
            false,
        ),
        "Asia/Singapore" | "Singapore" => names(
            "Singapore Standard Time",
            "Singapore Standard Time",
            "Singapore Standard Time",
            Some("Singapore Time"),
            false,
        ),
        "Asia/Shanghai" | "Asia/Chongqing" | "PRC" => names(
            "China Standard Time",
            "China Daylight Time",
            "China Standard Time",
            Some("China Time"),
            false,
        ),
        "Asia/Tokyo" | "Japan" => names(
            "Japan Standard Time",
            "Japan Daylight Time",
            "Japan Standard Time",
            Some("Japan Time"),
            false,
        ),
        "Asia/Seoul" | "ROK" => names(
            "Korean Standard Time",
            "Korean Daylight Time",
            "Korean Standard Time",
            Some("South Korea Time"),
            false,
        ),
        "Asia/Pyongyang" => names(
            "Korean Standard Time",
            "Korean Daylight Time",
            "Korean Standard Time",
            Some("North Korea Time"),
            false,
        ),
        "Asia/Kathmandu" | "Asia/Katmandu" => names(
            "Nepal Time",
            "Nepal Time",
            "Nepal Time",
            Some("Nepal Time"),
            false,
        ),
        "Australia/Sydney" | "Australia/Melbourne" | "Australia/Brisbane"
        | "Australia/Hobart" | "Australia/ACT" | "Australia/NSW" => names(
            "Australian Eastern Standard Time",
            "Australian Eastern Daylight Time",
            "Eastern Australia Time",
            None,
            false,
        ),
        "Australia/Adelaide" | "Australia/Darwin" | "Australia/Broken_Hill"
        | "Australia/South" | "Australia/North" => names(
            "Australian Central Standard Time",
            "Australian Central Daylight Time",
            "Central Australia Time",
            None,
            false,
        ),
        "Australia/Perth" | "Australia/West" => names(
            "Australian Western Standard Time",
            "Australian Western Daylight Time",
            "Western Australia Time",
            None,
            false,
        ),
        "Pacific/Auckland" | "NZ" => names(
            "New Zealand Standard Time",
            "New Zealand Daylight Time",
            "New Zealand Time",
            Some("New Zealand Time"),
            false,
        ),
        "Pacific/Apia" => names(
            "Apia Standard Time",
            "Apia Daylight Time",
            "Apia Time",
            Some("Samoa Time"),
            false,
        ),
        _ => return None,
    };
    Some(zone)
}
