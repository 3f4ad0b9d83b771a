// API request and response models
// Author: Gabriel Demetrios Lafis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::chart::{ChartFamily, ChartSpec};
use crate::report::{ParameterBinding, ParameterSpec};
use crate::table::{ExportScope, PageInfo, SortState};

/// Request to list the parameters of a query template
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub template: String,
    /// Parameters the caller already knows about
    #[serde(default)]
    pub known: Vec<ParameterSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub parameters: Vec<String>,
    pub discovered: Vec<String>,
}

/// Request to bind parameter values
#[derive(Debug, Clone, Deserialize)]
pub struct BindRequest {
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub previous: ParameterBinding,
    /// Reference date for temporal defaults; the server date when absent
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BindResponse {
    pub binding: ParameterBinding,
    pub valid: bool,
    pub error: Option<String>,
}

/// Request to map rows to a chart
#[derive(Debug, Clone, Deserialize)]
pub struct ChartRequest {
    /// Used to guess the family when `chart_family` is absent
    #[serde(default)]
    pub report_name: String,
    #[serde(default)]
    pub chart_family: Option<ChartFamily>,
    #[serde(default)]
    pub results: JsonValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub chart_family: ChartFamily,
    pub chart: Option<ChartSpec>,
}

/// Request for one page of a searched and sorted table
#[derive(Debug, Clone, Deserialize)]
pub struct TableRequest {
    #[serde(default)]
    pub results: JsonValue,
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub sort: SortState,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    pub columns: Vec<String>,
    pub rows: JsonValue,
    pub paging: PageInfo,
}

/// Request to export rows as delimited text
#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub results: JsonValue,
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub sort: SortState,
    #[serde(default)]
    pub scope: ExportScope,
    /// Falls back to the configured delimiter
    #[serde(default)]
    pub delimiter: Option<char>,
    /// Names the download when present
    #[serde(default)]
    pub report_name: Option<String>,
}

fn default_page_size() -> usize {
    25
}
