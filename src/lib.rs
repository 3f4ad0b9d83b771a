// Rust Report Engine
// Author: Gabriel Demetrios Lafis

//! # Rust Report Engine
//!
//! Client-side pipeline for parameterized database reports.
//!
//! ## Features
//!
//! - Parameter discovery from `{NAME}` placeholders in query templates
//! - Default binding with date lookback and cached previous values
//! - Report execution with request ordering and recurring polling
//! - Chart mapping (bar, line, pie, donut) from tabular results
//! - Table search, sort, paging and delimited-text export
//! - Favorites and binding persistence in a key-value store
//! - REST facade for thin renderers
//!
//! ## Example
//!
//! ```rust
//! use rust_report_engine::{
//!     chart::{ChartFamily, ChartMapper},
//!     data::rowset_from_json,
//!     report::extract_parameters,
//! };
//!
//! let params = extract_parameters("SELECT * FROM t WHERE d >= '{START_DATE}' AND d <= '{END_DATE}'");
//! assert_eq!(params, vec!["START_DATE", "END_DATE"]);
//!
//! let rows = rowset_from_json(&serde_json::json!([
//!     {"date": "2024-01-01", "count": 3},
//!     {"date": "2024-01-02", "count": 5},
//! ]))
//! .unwrap();
//!
//! let chart = ChartMapper::new().map(&rows, ChartFamily::Bar).unwrap();
//! assert_eq!(chart.label_key, "date");
//! assert_eq!(chart.series_keys, vec!["count"]);
//! ```

pub mod data;
pub mod report;
pub mod runner;
pub mod chart;
pub mod table;
pub mod storage;
pub mod api;
pub mod utils;

// Re-export main types
pub use data::{Row, RowSet, Value};
pub use report::{ParameterBinding, ParameterSpec, ReportDefinition};
pub use runner::{ReportTransport, ReportView};
pub use chart::{ChartFamily, ChartSpec};
pub use table::TableEngine;
pub use api::Server;
pub use utils::Config;
