//! Error types for tz-shift operations.
//!
//! Most of the crate reports bad input by NaN-poisoning rather than through
//! this type. `TzError` only appears where an operation returns a `Result`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TzError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Unsupported format style: {0}")]
    UnsupportedStyle(String),
}

pub type Result<T> = std::result::Result<T, TzError>;
