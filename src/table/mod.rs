// Client-side table engine: search, sort, paging and export
// Author: Gabriel Demetrios Lafis

mod export;

pub use export::*;

use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::{RowSet, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
    #[default]
    None,
}

/// Active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortState {
    /// Insertion order
    pub fn none() -> Self {
        SortState::default()
    }

    pub fn by(key: &str, direction: SortDirection) -> Self {
        if direction == SortDirection::None {
            return SortState::none();
        }
        SortState {
            key: Some(key.to_string()),
            direction,
        }
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some() && self.direction != SortDirection::None
    }

    /// Select a column header.
    ///
    /// Repeated selection of the same column cycles ascending, descending,
    /// then back to insertion order; a different column starts ascending.
    pub fn toggle(&mut self, key: &str) {
        let same_key = self.key.as_deref() == Some(key);

        *self = match (same_key, self.direction) {
            (true, SortDirection::Ascending) => SortState::by(key, SortDirection::Descending),
            (true, SortDirection::Descending) => SortState::none(),
            _ => SortState::by(key, SortDirection::Ascending),
        };
    }
}

/// Indices of the rows whose string form contains `text` in any cell,
/// ignoring case. An empty filter keeps every row.
pub fn filter_indices(rows: &RowSet, text: &str) -> Vec<usize> {
    let needle = text.to_lowercase();
    if needle.is_empty() {
        return (0..rows.len()).collect();
    }

    rows.rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            row.values
                .iter()
                .any(|value| value.to_string().to_lowercase().contains(&needle))
        })
        .map(|(index, _)| index)
        .collect()
}

/// Rows matching the search text, in their original order
pub fn filter_rows(rows: &RowSet, text: &str) -> RowSet {
    rows.select_rows(&filter_indices(rows, text))
}

/// Sort key of a non-null cell. Numbers rank ahead of text so that mixed
/// columns still have a total order.
#[derive(Debug, Clone, PartialEq)]
enum CellKey {
    Number(f64),
    Text(String),
}

impl CellKey {
    fn of(value: &Value) -> Self {
        match value.as_f64() {
            Some(number) => CellKey::Number(number),
            None => CellKey::Text(value.to_string().to_lowercase()),
        }
    }

    fn order(&self, other: &CellKey) -> Ordering {
        match (self, other) {
            (CellKey::Number(x), CellKey::Number(y)) => x.total_cmp(y),
            (CellKey::Number(_), CellKey::Text(_)) => Ordering::Less,
            (CellKey::Text(_), CellKey::Number(_)) => Ordering::Greater,
            (CellKey::Text(x), CellKey::Text(y)) => x.cmp(y),
        }
    }
}

/// Order two non-null cells: numbers by value, ahead of any text, and text
/// by its case-folded form.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    CellKey::of(a).order(&CellKey::of(b))
}

/// Stable sort of row indices. Nulls go last in either direction and an
/// inactive sort or unknown column leaves the order untouched.
pub fn sort_indices(rows: &RowSet, indices: &mut [usize], sort: &SortState) {
    if !sort.is_active() {
        return;
    }

    let column = match sort.key.as_deref().and_then(|key| rows.column_index(key)) {
        Some(column) => column,
        None => return,
    };

    let descending = sort.direction == SortDirection::Descending;
    let keys: Vec<Option<CellKey>> = rows
        .rows
        .iter()
        .map(|row| match row.get(column) {
            Some(value) if !value.is_null() => Some(CellKey::of(value)),
            _ => None,
        })
        .collect();

    indices.sort_by(|&left, &right| match (&keys[left], &keys[right]) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if descending => b.order(a),
        (Some(a), Some(b)) => a.order(b),
    });
}

/// Rows in sorted order
pub fn sort_rows(rows: &RowSet, sort: &SortState) -> RowSet {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    sort_indices(rows, &mut indices, sort);
    rows.select_rows(&indices)
}

/// Slice bounds for one page of the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

/// Search, sort and page state over one row set
#[derive(Debug, Clone, Default)]
pub struct TableEngine {
    rows: RowSet,
    sort: SortState,
    filter: String,
}

impl TableEngine {
    pub fn new(rows: RowSet) -> Self {
        TableEngine {
            rows,
            sort: SortState::none(),
            filter: String::new(),
        }
    }

    /// Replace the row set; the sort resets, the search text is kept
    pub fn set_rows(&mut self, rows: RowSet) {
        debug!("Table engine received {} rows", rows.len());
        self.rows = rows;
        self.sort = SortState::none();
    }

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Header click on `column`
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort.toggle(column);
    }

    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.to_string();
    }

    /// Indices of the filtered rows in display order
    pub fn view_indices(&self) -> Vec<usize> {
        let mut indices = filter_indices(&self.rows, &self.filter);
        sort_indices(&self.rows, &mut indices, &self.sort);
        indices
    }

    /// The filtered and sorted rows
    pub fn view(&self) -> RowSet {
        self.rows.select_rows(&self.view_indices())
    }

    /// Bounds of page `page` (zero based) of the current view.
    /// Pages past the end are empty; a zero page size is treated as one.
    pub fn page(&self, page: usize, page_size: usize) -> PageInfo {
        let page_size = page_size.max(1);
        let total_rows = self.view_indices().len();
        let total_pages = (total_rows + page_size - 1) / page_size;
        let start = page.saturating_mul(page_size).min(total_rows);
        let end = start.saturating_add(page_size).min(total_rows);

        PageInfo {
            page,
            page_size,
            total_rows,
            total_pages,
            start,
            end,
        }
    }
}
