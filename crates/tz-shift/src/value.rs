//! Conversion of instant-like values to time values.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, TimeZone};

use crate::calendar::time_clip;
use crate::parse::parse_instant;

/// Anything that denotes an absolute instant.
///
/// `time_value` returns milliseconds since the Unix epoch, or NaN when the
/// value does not denote a representable instant.
pub trait TimeValue {
    fn time_value(&self) -> f64;
}

impl TimeValue for f64 {
    fn time_value(&self) -> f64 {
        time_clip(*self)
    }
}

impl TimeValue for i64 {
    fn time_value(&self) -> f64 {
        time_clip(*self as f64)
    }
}

impl TimeValue for str {
    fn time_value(&self) -> f64 {
        parse_instant(self)
    }
}

impl TimeValue for String {
    fn time_value(&self) -> f64 {
        parse_instant(self)
    }
}

impl<Tz: TimeZone> TimeValue for DateTime<Tz> {
    fn time_value(&self) -> f64 {
        time_clip(self.timestamp_millis() as f64)
    }
}

impl TimeValue for SystemTime {
    fn time_value(&self) -> f64 {
        let ms = match self.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_millis() as f64,
            Err(before) => -(before.duration().as_millis() as f64),
        };
        time_clip(ms)
    }
}

impl<T: TimeValue + ?Sized> TimeValue for &T {
    fn time_value(&self) -> f64 {
        (**self).time_value()
    }
}
