// Heuristic mapping of row sets onto chart series
// Author: Gabriel Demetrios Lafis

use log::debug;

use super::{palette_color, ChartFamily, ChartSpec, Series, SeriesColor};
use crate::data::RowSet;

/// Column name fragments that mark a good label (x axis) column
pub const LABEL_HINTS: &[&str] = &["date", "time", "name", "day", "hour", "category", "id"];

/// Chooses which columns become labels and series.
///
/// Implementations must be deterministic: the same row set always yields
/// the same choice.
pub trait MappingPolicy {
    /// Column used for labels
    fn label_key(&self, rows: &RowSet) -> Option<String>;

    /// Columns plotted as series, in plotting order
    fn series_keys(&self, rows: &RowSet, label_key: &str) -> Vec<String>;
}

/// Name- and content-based column inference
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy;

impl MappingPolicy for HeuristicPolicy {
    fn label_key(&self, rows: &RowSet) -> Option<String> {
        rows.columns
            .iter()
            .find(|column| {
                let lower = column.to_lowercase();
                LABEL_HINTS.iter().any(|hint| lower.contains(hint))
            })
            .or_else(|| rows.columns.first())
            .cloned()
    }

    fn series_keys(&self, rows: &RowSet, label_key: &str) -> Vec<String> {
        let mut keys: Vec<String> = rows
            .columns
            .iter()
            .filter(|column| column.as_str() != label_key && is_numeric_column(rows, column))
            .cloned()
            .collect();

        if keys.len() < 2 {
            let widened = rows
                .columns
                .iter()
                .filter(|column| column.as_str() != label_key)
                .find(|column| !keys.contains(*column) && is_widening_candidate(rows, column))
                .or_else(|| {
                    // categorical-only data still gets one series
                    if keys.is_empty() && is_widening_candidate(rows, label_key) {
                        rows.columns.iter().find(|column| column.as_str() == label_key)
                    } else {
                        None
                    }
                })
                .cloned();

            if let Some(column) = widened {
                debug!("Widening chart series with non-numeric column {}", column);
                keys.push(column);
            }
        }

        keys
    }
}

/// True when every row holds a numeric value (or numeric text) in `column`
pub fn is_numeric_column(rows: &RowSet, column: &str) -> bool {
    rows.column_index(column).is_some()
        && !rows.is_empty()
        && rows.column_values(column).all(|v| v.is_numeric())
}

fn is_widening_candidate(rows: &RowSet, column: &str) -> bool {
    let lower = column.to_lowercase();
    let is_identifier = lower == "id" || lower.starts_with("id_") || lower.ends_with("_id");
    let is_temporal = lower.contains("date") || lower.contains("time");

    !is_identifier && !is_temporal && !is_numeric_column(rows, column)
}

/// Turns row sets into chart specifications
#[derive(Debug, Clone, Default)]
pub struct ChartMapper<P = HeuristicPolicy> {
    policy: P,
}

impl ChartMapper<HeuristicPolicy> {
    pub fn new() -> Self {
        ChartMapper {
            policy: HeuristicPolicy,
        }
    }
}

impl<P: MappingPolicy> ChartMapper<P> {
    /// Mapper with a substitute column policy
    pub fn with_policy(policy: P) -> Self {
        ChartMapper { policy }
    }

    /// Project `rows` onto the requested chart family.
    ///
    /// Returns `None` for an empty row set or when no column can be
    /// plotted. Labels keep row order. Non-numeric cells plot as 0.
    ///
    /// Pie and donut charts plot only the first series key; any further
    /// keys stay listed in `series_keys` but are not drawn.
    pub fn map(&self, rows: &RowSet, family: ChartFamily) -> Option<ChartSpec> {
        if rows.is_empty() {
            return None;
        }

        let label_key = self.policy.label_key(rows)?;
        let series_keys = self.policy.series_keys(rows, &label_key);
        if series_keys.is_empty() {
            debug!("No plottable columns besides label {}", label_key);
            return None;
        }

        let labels = rows.column_values(&label_key).map(|v| v.to_string()).collect();

        let series = if family.is_radial() {
            let key = &series_keys[0];
            let colors = (0..rows.len()).map(|i| palette_color(i).to_string()).collect();
            vec![Series {
                name: key.clone(),
                values: series_values(rows, key),
                color: SeriesColor::PerPoint(colors),
            }]
        } else {
            series_keys
                .iter()
                .enumerate()
                .map(|(index, key)| Series {
                    name: key.clone(),
                    values: series_values(rows, key),
                    color: SeriesColor::Uniform(palette_color(index).to_string()),
                })
                .collect()
        };

        Some(ChartSpec {
            chart_family: family,
            label_key,
            series_keys,
            labels,
            series,
        })
    }
}

/// Map with the default heuristic policy
pub fn map_to_chart(rows: &RowSet, family: ChartFamily) -> Option<ChartSpec> {
    ChartMapper::new().map(rows, family)
}

fn series_values(rows: &RowSet, key: &str) -> Vec<f64> {
    rows.column_values(key)
        .map(|v| v.as_f64().unwrap_or(0.0))
        .collect()
}
