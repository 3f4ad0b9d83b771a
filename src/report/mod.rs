// Report definitions and parameter handling
// Author: Gabriel Demetrios Lafis

mod bind;
mod extract;

pub use bind::*;
pub use extract::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Concrete parameter values for one report view, keyed by parameter name
pub type ParameterBinding = BTreeMap<String, String>;

/// A parameterized report as administered on the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub query_template: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

impl ReportDefinition {
    pub fn new(id: &str, query_template: &str) -> Self {
        ReportDefinition {
            id: id.to_string(),
            display_name: id.to_string(),
            description: String::new(),
            category: String::new(),
            query_template: query_template.to_string(),
            parameters: Vec::new(),
        }
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Build a definition from a `/reports/details/{name}` payload.
    ///
    /// The payload lists parameters as a `name -> default` object; kinds
    /// are inferred from the names.
    pub fn from_details(id: &str, details: &JsonValue) -> Self {
        let text = |key: &str| {
            details
                .get(key)
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let display_name = match text("display_name") {
            name if name.is_empty() => id.to_string(),
            name => name,
        };

        let query_template = match text("sql") {
            sql if sql.is_empty() => text("sql_query"),
            sql => sql,
        };

        let parameters = details
            .get("parameters")
            .and_then(JsonValue::as_object)
            .map(|params| {
                params
                    .iter()
                    .map(|(name, default)| {
                        let mut spec = ParameterSpec::new(name, ParameterKind::infer_from_name(name));
                        spec.default_value = match default {
                            JsonValue::Null => None,
                            JsonValue::String(s) => Some(s.clone()),
                            other => Some(other.to_string()),
                        };
                        spec
                    })
                    .collect()
            })
            .unwrap_or_default();

        ReportDefinition {
            id: id.to_string(),
            display_name,
            description: text("description"),
            category: text("category"),
            query_template,
            parameters,
        }
    }
}

/// Declared input of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(default)]
    pub default_value: Option<String>,
    /// Allowed values for `select` and `multiselect`
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl ParameterSpec {
    pub fn new(name: &str, kind: ParameterKind) -> Self {
        ParameterSpec {
            name: name.to_string(),
            kind,
            default_value: None,
            options: Vec::new(),
            required: false,
        }
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Date,
    Datetime,
    Text,
    Number,
    Select,
    Multiselect,
}

impl ParameterKind {
    /// Kind guessed for a freshly discovered placeholder
    pub fn infer_from_name(name: &str) -> Self {
        if name.contains("DATE") {
            ParameterKind::Date
        } else {
            ParameterKind::Text
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, ParameterKind::Date | ParameterKind::Datetime)
    }
}

/// One entry of the `/reports/list` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub report_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub parameters: JsonValue,
}

impl ReportSummary {
    /// Case-insensitive match over display name and description.
    /// An empty term matches every report.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.display_name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}
