// Placeholder extraction from query templates
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;
use std::sync::OnceLock;

use log::debug;
use regex::{Captures, Regex};

use super::{ParameterBinding, ParameterKind, ParameterSpec, ReportDefinition};

/// Placeholders filled in by the backend itself, never by the user
pub const SYSTEM_PLACEHOLDERS: &[&str] = &["TABLE_NAME"];

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([A-Z_]+)\}").expect("placeholder pattern is a valid regex"))
}

/// Finds `{UPPER_SNAKE_CASE}` placeholders in a query template
#[derive(Debug, Clone)]
pub struct ParameterExtractor {
    excluded: HashSet<String>,
}

impl ParameterExtractor {
    /// Create an extractor that skips the system placeholders
    pub fn new() -> Self {
        Self::with_excluded(SYSTEM_PLACEHOLDERS)
    }

    /// Create an extractor with a custom exclusion list
    pub fn with_excluded(excluded: &[&str]) -> Self {
        ParameterExtractor {
            excluded: excluded.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Placeholder names in order of first occurrence, without duplicates
    pub fn extract(&self, template: &str) -> Vec<String> {
        let mut seen = HashSet::new();

        placeholder_pattern()
            .captures_iter(template)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|name| !self.excluded.contains(*name))
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }

    /// Placeholders of `template` that are not yet declared in `known`
    pub fn discover(&self, template: &str, known: &[ParameterSpec]) -> Vec<String> {
        self.extract(template)
            .into_iter()
            .filter(|name| !known.iter().any(|p| &p.name == name))
            .collect()
    }

    /// Append a spec for every undeclared placeholder of the definition's
    /// template and return the names that were added.
    pub fn detect_into(&self, definition: &mut ReportDefinition) -> Vec<String> {
        let discovered = self.discover(&definition.query_template, &definition.parameters);

        for name in &discovered {
            let kind = ParameterKind::infer_from_name(name);
            debug!("Detected parameter {} ({:?}) in report {}", name, kind, definition.id);
            definition.parameters.push(ParameterSpec::new(name, kind));
        }

        discovered
    }
}

impl Default for ParameterExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract user placeholders with the default exclusion list
pub fn extract_parameters(template: &str) -> Vec<String> {
    ParameterExtractor::new().extract(template)
}

/// Substitute bound values into a template for preview.
///
/// Single quotes in values are doubled. Placeholders without a bound value
/// stay as written.
pub fn render_template(template: &str, binding: &ParameterBinding) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures| match binding.get(&caps[1]) {
            Some(value) => value.replace('\'', "''"),
            None => caps[0].to_string(),
        })
        .into_owned()
}
