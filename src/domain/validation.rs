//! Boundary checks for submitted records.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::enums::ParseEnumError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} is not a valid date/time: {value:?}")]
    BadDate { field: &'static str, value: String },
    #[error("End date must be after start date")]
    EndBeforeStart,
    #[error(transparent)]
    BadEnum(#[from] ParseEnumError),
}

/// Trim a required text field, rejecting blanks.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, mapping blanks to `None`.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse the formats a `datetime-local` input or a stored timestamp produces.
pub fn parse_datetime(field: &'static str, value: &str) -> Result<NaiveDateTime, ValidationError> {
    let value = required(field, value)?;
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&value, fmt).ok())
        .ok_or(ValidationError::BadDate { field, value })
}

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let value = required(field, value)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|_| ValidationError::BadDate { field, value })
}
