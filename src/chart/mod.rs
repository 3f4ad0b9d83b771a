// Chart projection of report results
// Author: Gabriel Demetrios Lafis

mod mapper;

pub use mapper::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed series palette. Colors are picked by index modulo its length.
pub const PALETTE: &[&str] = &[
    "rgba(54, 162, 235, 0.6)",
    "rgba(255, 99, 132, 0.6)",
    "rgba(75, 192, 192, 0.6)",
    "rgba(255, 159, 64, 0.6)",
    "rgba(153, 102, 255, 0.6)",
];

/// Palette entry for an index, wrapping around
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFamily {
    Bar,
    Line,
    Pie,
    Donut,
}

impl ChartFamily {
    pub const ALL: [ChartFamily; 4] = [ChartFamily::Bar, ChartFamily::Line, ChartFamily::Pie, ChartFamily::Donut];

    /// Pie and donut charts plot a single value dimension
    pub fn is_radial(&self) -> bool {
        matches!(self, ChartFamily::Pie | ChartFamily::Donut)
    }

    /// Initial family guessed from a report's technical name.
    ///
    /// Distribution reports open as pie charts, trend and time analyses as
    /// line charts, everything else as bars.
    pub fn infer_from_report_name(report_name: &str) -> Self {
        const DISTRIBUTION: &[&str] = &["Dagilim", "Dağılım", "Topik"];
        const TREND: &[&str] = &["Trend", "Analiz", "Zaman"];

        if DISTRIBUTION.iter().any(|m| report_name.contains(m)) {
            ChartFamily::Pie
        } else if TREND.iter().any(|m| report_name.contains(m)) {
            ChartFamily::Line
        } else {
            ChartFamily::Bar
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartFamily::Bar => "bar",
            ChartFamily::Line => "line",
            ChartFamily::Pie => "pie",
            ChartFamily::Donut => "donut",
        }
    }
}

impl fmt::Display for ChartFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(ChartFamily::Bar),
            "line" => Ok(ChartFamily::Line),
            "pie" => Ok(ChartFamily::Pie),
            "donut" | "doughnut" => Ok(ChartFamily::Donut),
            _ => Err(format!("Unknown chart family: {}", s)),
        }
    }
}

/// The chart family shown by a report view.
///
/// Starts from the name-based guess; once the user picks a family the guess
/// is never applied again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilySelection {
    family: ChartFamily,
    explicit: bool,
}

impl FamilySelection {
    pub fn for_report(report_name: &str) -> Self {
        FamilySelection {
            family: ChartFamily::infer_from_report_name(report_name),
            explicit: false,
        }
    }

    pub fn family(&self) -> ChartFamily {
        self.family
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn select(&mut self, family: ChartFamily) {
        self.family = family;
        self.explicit = true;
    }
}

/// Chart-ready projection of a row set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub chart_family: ChartFamily,
    pub label_key: String,
    pub series_keys: Vec<String>,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub color: SeriesColor,
}

/// A single color for bar/line series, one per point for pie/donut
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesColor {
    Uniform(String),
    PerPoint(Vec<String>),
}
