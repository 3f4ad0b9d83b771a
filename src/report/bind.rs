// Parameter binding and validation
// Author: Gabriel Demetrios Lafis

use chrono::{Duration, Local, NaiveDate};
use log::debug;
use thiserror::Error;

use super::{ParameterBinding, ParameterKind, ParameterSpec};
use crate::utils::{validate_iso_date, validate_not_empty, validate_number, validate_option};

/// How far back a `*START*` date parameter defaults
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

const ISO_DATE: &str = "%Y-%m-%d";

/// Produces concrete parameter values from specs, earlier values and
/// type-specific defaults.
#[derive(Debug, Clone, Copy)]
pub struct ParameterBinder {
    today: NaiveDate,
}

impl ParameterBinder {
    /// Binder anchored at the local calendar date
    pub fn new() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    /// Binder anchored at a fixed date
    pub fn for_date(today: NaiveDate) -> Self {
        ParameterBinder { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Default for one parameter.
    ///
    /// Temporal kinds default to a date: a week back for names containing
    /// `START`, today otherwise. Other kinds use the stored default.
    pub fn default_value(&self, spec: &ParameterSpec) -> String {
        if spec.kind.is_temporal() {
            let date = if spec.name.contains("START") {
                self.today - Duration::days(DEFAULT_LOOKBACK_DAYS)
            } else {
                self.today
            };
            return date.format(ISO_DATE).to_string();
        }

        spec.default_value.clone().unwrap_or_default()
    }

    /// Bind every spec, keeping values from `previous` where present.
    /// Names in `previous` without a spec are dropped.
    pub fn bind(&self, specs: &[ParameterSpec], previous: &ParameterBinding) -> ParameterBinding {
        specs
            .iter()
            .map(|spec| {
                let value = match previous.get(&spec.name) {
                    Some(value) => value.clone(),
                    None => self.default_value(spec),
                };
                (spec.name.clone(), value)
            })
            .collect()
    }

    /// Discard user edits and bind defaults only
    pub fn reset(&self, specs: &[ParameterSpec]) -> ParameterBinding {
        debug!("Resetting {} parameters to defaults", specs.len());
        self.bind(specs, &ParameterBinding::new())
    }
}

impl Default for ParameterBinder {
    fn default() -> Self {
        Self::new()
    }
}

/// A binding that cannot be sent to the backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("parameter '{0}' is required")]
    MissingRequired(String),

    #[error("invalid value for parameter '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

impl ValidationError {
    /// Name of the offending parameter
    pub fn parameter(&self) -> &str {
        match self {
            ValidationError::MissingRequired(name) => name,
            ValidationError::InvalidValue { name, .. } => name,
        }
    }
}

/// Check a binding against its specs, reporting the first problem in spec order
pub fn validate_binding(specs: &[ParameterSpec], binding: &ParameterBinding) -> Result<(), ValidationError> {
    for spec in specs {
        let value = binding.get(&spec.name).map(String::as_str).unwrap_or("");

        if validate_not_empty(value, &spec.name).is_err() {
            if spec.required {
                return Err(ValidationError::MissingRequired(spec.name.clone()));
            }
            continue;
        }

        let checked = match spec.kind {
            ParameterKind::Number => validate_number(value, &spec.name),
            ParameterKind::Date => validate_iso_date(value, &spec.name),
            ParameterKind::Select if !spec.options.is_empty() => {
                validate_option(value, &spec.options, &spec.name)
            }
            ParameterKind::Multiselect if !spec.options.is_empty() => value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .try_for_each(|item| validate_option(item, &spec.options, &spec.name)),
            _ => Ok(()),
        };

        checked.map_err(|reason| ValidationError::InvalidValue {
            name: spec.name.clone(),
            reason,
        })?;
    }

    Ok(())
}
