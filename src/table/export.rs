// Delimited-text export of table views
// Author: Gabriel Demetrios Lafis

use std::path::Path;

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use super::TableEngine;
use crate::data::{DataError, DelimitedWriter, Row};

/// Which rows an export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// The filtered and sorted rows currently displayed
    #[default]
    View,
    /// Every row in insertion order, ignoring search and sort
    All,
}

impl TableEngine {
    /// Rows covered by an export, in output order
    pub fn export_rows(&self, scope: ExportScope) -> Vec<&Row> {
        let rows = self.rows();
        match scope {
            ExportScope::All => rows.rows.iter().collect(),
            ExportScope::View => self
                .view_indices()
                .into_iter()
                .map(|i| &rows.rows[i])
                .collect(),
        }
    }

    /// Render the chosen rows as delimited text with a header line
    pub fn export(&self, scope: ExportScope, delimiter: char) -> Result<String, DataError> {
        DelimitedWriter::new(delimiter).render(&self.rows().columns, self.export_rows(scope))
    }

    /// Write an export to disk
    pub fn export_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        scope: ExportScope,
        delimiter: char,
    ) -> Result<(), DataError> {
        DelimitedWriter::new(delimiter).write_file(path.as_ref(), &self.rows().columns, self.export_rows(scope))?;
        info!("Exported table to {}", path.as_ref().display());
        Ok(())
    }
}

/// `{report_name}_{YYYY-MM-DD}.csv`
pub fn export_file_name(report_name: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", report_name, date.format("%Y-%m-%d"))
}
