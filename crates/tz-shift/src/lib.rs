//! # tz-shift
//!
//! Time-zone-shifted dates and UTC offset transition tools.
//!
//! [`ZonedInstant`] lets calendar code read and write date fields as if the
//! process ran in another time zone, without touching process-wide state.
//! The free functions resolve the offset of a zone at an instant, enumerate
//! the offset changes of a zone over an interval, and name a zone.
//!
//! ## Modules
//!
//! - [`zoned`]: the zoned date value, its getters, setters and formatters
//! - [`offset`]: UTC offset resolution with process-wide caches
//! - [`scan`]: hierarchical month/day/hour search for offset changes
//! - [`format`]: the zone formatter seam and zone display names
//! - [`locale`]: `en-US` / `en-GB` locale rendering
//! - [`factory`]: zone-bound construction for generic date arithmetic
//! - [`calendar`]: UTC-domain calendar arithmetic on time values
//! - [`parse`]: instant string parsing
//! - [`value`]: conversion of instant-like values to time values
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```
//! use tz_shift::{resolve_offset, DateFields, ZonedInstant};
//!
//! let date = ZonedInstant::from_fields(DateFields::new(2020.0, 0.0), "Asia/Kolkata");
//! assert_eq!(date.to_iso_string(), "2020-01-01T00:00:00.000+05:30");
//! assert_eq!(resolve_offset(Some("Asia/Kolkata"), &date), 330.0);
//! assert_eq!(date.timezone_offset(), -330.0);
//! ```

pub mod calendar;
pub mod error;
pub mod factory;
pub mod format;
pub mod locale;
pub mod offset;
pub mod parse;
pub mod scan;
pub mod value;
pub mod zoned;

pub use error::TzError;
pub use factory::{tz, ZoneFactory, ZonedConstructible};
pub use format::{tz_name, LocalFormat, TzdbFormat, ZoneFormat, ZoneNameStyle};
pub use locale::{DateStyle, LocaleOptions, TimeStyle};
pub use offset::{parse_gmt_offset, resolve_offset};
pub use parse::parse_instant;
pub use scan::{scan, Interval, TzChange};
pub use value::TimeValue;
pub use zoned::{DateFields, ZonedInstant};
