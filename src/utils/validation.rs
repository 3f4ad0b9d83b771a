// Validation utilities
// Author: Gabriel Demetrios Lafis

use chrono::NaiveDate;

use crate::data::parse_finite;

/// Validate that a value is not blank
pub fn validate_not_empty(value: &str, name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{}' cannot be empty", name))
    } else {
        Ok(())
    }
}

/// Validate that a value reads as a finite number
pub fn validate_number(value: &str, name: &str) -> Result<(), String> {
    match parse_finite(value) {
        Some(_) => Ok(()),
        None => Err(format!("'{}' must be a number, got '{}'", name, value)),
    }
}

/// Validate that a value is an ISO 8601 calendar date
pub fn validate_iso_date(value: &str, name: &str) -> Result<(), String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("'{}' must be a date (YYYY-MM-DD), got '{}'", name, value))
}

/// Validate that a value is one of the allowed options
pub fn validate_option(value: &str, options: &[String], name: &str) -> Result<(), String> {
    if options.iter().any(|o| o == value) {
        Ok(())
    } else {
        Err(format!(
            "'{}' must be one of [{}], got '{}'",
            name,
            options.join(", "),
            value
        ))
    }
}
