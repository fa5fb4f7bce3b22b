//! Zone-bound construction for date arithmetic code.
//!
//! Generic calendar code that builds new dates "like" an existing one goes
//! through [`ZonedConstructible`], so the result keeps the input's zone.
//! [`tz`] returns a factory bound to one zone name.

use crate::value::TimeValue;
use crate::zoned::{DateFields, ZonedInstant};

/// Types that can build a new value of themselves from any instant.
pub trait ZonedConstructible: Sized {
    /// A value denoting `value`, carrying over everything but the instant
    /// from `self`.
    fn construct_from<T: TimeValue + ?Sized>(&self, value: &T) -> Self;
}

impl ZonedConstructible for ZonedInstant {
    fn construct_from<T: TimeValue + ?Sized>(&self, value: &T) -> Self {
        ZonedInstant::new(value, self.time_zone())
    }
}

/// Builds [`ZonedInstant`]s in one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneFactory {
    time_zone: String,
}

/// A factory for instants in `name`.
///
/// # Examples
///
/// ```
/// use tz_shift::tz;
///
/// let singapore = tz("Asia/Singapore");
/// let date = singapore.at("2020-01-01T00:00:00Z");
/// assert_eq!(date.to_iso_string(), "2020-01-01T08:00:00.000+08:00");
/// ```
pub fn tz(name: impl Into<String>) -> ZoneFactory {
    ZoneFactory {
        time_zone: name.into(),
    }
}

impl ZoneFactory {
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    /// The instant `value` denotes, in this zone.
    pub fn at<T: TimeValue + ?Sized>(&self, value: &T) -> ZonedInstant {
        ZonedInstant::new(value, self.time_zone.as_str())
    }

    /// The instant at which this zone's clocks show `fields`.
    pub fn fields(&self, fields: DateFields) -> ZonedInstant {
        ZonedInstant::from_fields(fields, self.time_zone.as_str())
    }

    pub fn now(&self) -> ZonedInstant {
        ZonedInstant::now(self.time_zone.as_str())
    }
}
