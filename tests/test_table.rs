// Table engine tests
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde_json::json;

use rust_report_engine::{
    data::{read_delimited, rowset_from_json, RowSet, Value},
    table::{
        compare_values, export_file_name, filter_rows, sort_rows, ExportScope, SortDirection, SortState, TableEngine,
    },
};

fn sample() -> RowSet {
    rowset_from_json(&json!([
        {"name": "banana", "qty": 10, "note": "fresh"},
        {"name": "Apple", "qty": 2, "note": null},
        {"name": "cherry", "qty": null, "note": "red, ripe"},
        {"name": "date", "qty": 33, "note": "dry"},
    ]))
    .unwrap()
}

fn names(rows: &RowSet) -> Vec<String> {
    rows.column_values("name").map(|v| v.to_string()).collect()
}

#[test]
fn test_filter_matches_any_cell_ignoring_case() {
    let rows = sample();

    assert_eq!(names(&filter_rows(&rows, "APP")), vec!["Apple"]);
    assert_eq!(names(&filter_rows(&rows, "ripe")), vec!["cherry"]);
    assert_eq!(names(&filter_rows(&rows, "r")), vec!["banana", "cherry", "date"]);
    assert_eq!(names(&filter_rows(&rows, "33")), vec!["date"]);
    assert_eq!(filter_rows(&rows, "").len(), rows.len());
    assert!(filter_rows(&rows, "zzz").is_empty());
}

#[test]
fn test_filter_is_idempotent() {
    let rows = sample();

    for text in ["a", "e", "10", ""] {
        let once = filter_rows(&rows, text);
        assert_eq!(filter_rows(&once, text), once);
    }
}

#[test]
fn test_sort_numeric_with_nulls_last() {
    let rows = sample();

    let ascending = sort_rows(&rows, &SortState::by("qty", SortDirection::Ascending));
    assert_eq!(names(&ascending), vec!["Apple", "banana", "date", "cherry"]);

    let descending = sort_rows(&rows, &SortState::by("qty", SortDirection::Descending));
    assert_eq!(names(&descending), vec!["date", "banana", "Apple", "cherry"]);
}

#[test]
fn test_sort_text_ignores_case() {
    let rows = sample();

    let sorted = sort_rows(&rows, &SortState::by("name", SortDirection::Ascending));

    assert_eq!(names(&sorted), vec!["Apple", "banana", "cherry", "date"]);
}

#[test]
fn test_descending_reverses_ascending() {
    let rows = sample();

    let mut ascending = names(&sort_rows(&rows, &SortState::by("name", SortDirection::Ascending)));
    let descending = names(&sort_rows(&rows, &SortState::by("name", SortDirection::Descending)));
    ascending.reverse();

    assert_eq!(ascending, descending);
}

#[test]
fn test_sort_mixed_numbers_and_text() {
    let cycle = ["10", "9", "1a", "b", "100", "2x", "3", "20", "a", "11", "1b", "5"];
    let rows = rowset_from_json(&json!((0..40)
        .map(|i| json!({"k": cycle[i % cycle.len()], "seq": i}))
        .collect::<Vec<_>>()))
    .unwrap();
    let keys = |rows: &RowSet| -> Vec<String> {
        let mut keys: Vec<String> = rows.column_values("k").map(|v| v.to_string()).collect();
        keys.dedup();
        keys
    };

    // Numbers first by value, then text
    let ascending = sort_rows(&rows, &SortState::by("k", SortDirection::Ascending));
    assert_eq!(ascending.len(), 40);
    assert_eq!(
        keys(&ascending),
        vec!["3", "5", "9", "10", "11", "20", "100", "1a", "1b", "2x", "a", "b"]
    );

    let descending = sort_rows(&rows, &SortState::by("k", SortDirection::Descending));
    let mut reversed = keys(&ascending);
    reversed.reverse();
    assert_eq!(keys(&descending), reversed);

    // 9 < 10, 10 < 1a and 9 < 1a
    assert_eq!(compare_values(&Value::from("9"), &Value::from("10")), Ordering::Less);
    assert_eq!(compare_values(&Value::from("10"), &Value::from("1a")), Ordering::Less);
    assert_eq!(compare_values(&Value::from("9"), &Value::from("1a")), Ordering::Less);
}

#[test]
fn test_sort_is_stable() {
    let rows = rowset_from_json(&json!([
        {"group": "b", "seq": 1},
        {"group": "a", "seq": 2},
        {"group": "b", "seq": 3},
        {"group": "a", "seq": 4},
    ]))
    .unwrap();

    let sorted = sort_rows(&rows, &SortState::by("group", SortDirection::Ascending));
    let seq: Vec<String> = sorted.column_values("seq").map(|v| v.to_string()).collect();

    assert_eq!(seq, vec!["2", "4", "1", "3"]);
}

#[test]
fn test_unknown_sort_key_keeps_order() {
    let rows = sample();

    let sorted = sort_rows(&rows, &SortState::by("missing", SortDirection::Ascending));

    assert_eq!(sorted, rows);
}

#[test]
fn test_toggle_cycle() {
    let mut sort = SortState::none();

    sort.toggle("qty");
    assert_eq!(sort, SortState::by("qty", SortDirection::Ascending));
    sort.toggle("qty");
    assert_eq!(sort, SortState::by("qty", SortDirection::Descending));
    sort.toggle("qty");
    assert_eq!(sort, SortState::none());
    assert!(!sort.is_active());

    sort.toggle("qty");
    sort.toggle("name");
    assert_eq!(sort, SortState::by("name", SortDirection::Ascending));
}

#[test]
fn test_new_rows_reset_sort_but_keep_filter() {
    let mut engine = TableEngine::new(sample());
    engine.toggle_sort("qty");
    engine.set_filter("a");

    engine.set_rows(sample());

    assert!(!engine.sort_state().is_active());
    assert_eq!(engine.filter_text(), "a");
    // insertion order restored
    assert_eq!(names(&engine.view()), vec!["banana", "Apple", "date"]);
}

#[test]
fn test_view_filters_then_sorts() {
    let mut engine = TableEngine::new(sample());
    engine.set_filter("an");
    engine.set_sort(SortState::by("name", SortDirection::Descending));
    assert_eq!(names(&engine.view()), vec!["banana"]);

    engine.set_filter("e");
    assert_eq!(names(&engine.view()), vec!["date", "cherry", "banana", "Apple"]);
}

#[test]
fn test_paging() {
    let mut engine = TableEngine::new(sample());
    engine.set_sort(SortState::by("name", SortDirection::Ascending));

    let first = engine.page(0, 3);
    assert_eq!((first.total_rows, first.total_pages, first.start, first.end), (4, 2, 0, 3));

    let second = engine.page(1, 3);
    assert_eq!((second.start, second.end), (3, 4));
    let indices = engine.view_indices();
    let page = engine.rows().select_rows(&indices[second.start..second.end]);
    assert_eq!(names(&page), vec!["date"]);

    let past_end = engine.page(5, 3);
    assert_eq!((past_end.start, past_end.end), (4, 4));

    assert_eq!(engine.page(0, 0).page_size, 1);
}

#[test]
fn test_export_view_quotes_and_nulls() {
    let mut engine = TableEngine::new(sample());
    engine.set_filter("r");

    let text = engine.export(ExportScope::View, ',').unwrap();

    assert_eq!(text, "name,qty,note\nbanana,10,fresh\ncherry,,\"red, ripe\"\ndate,33,dry\n");
}

#[test]
fn test_export_all_ignores_view() {
    let mut engine = TableEngine::new(sample());
    engine.set_filter("zzz");
    engine.set_sort(SortState::by("qty", SortDirection::Descending));

    let text = engine.export(ExportScope::All, ';').unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "name;qty;note");
    assert_eq!(lines[1], "banana;10;fresh");
    assert_eq!(lines[2], "Apple;2;");
    assert_eq!(lines[3], "cherry;;red, ripe");
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_export_round_trip() {
    let engine = TableEngine::new(sample());

    let text = engine.export(ExportScope::All, ',').unwrap();
    let parsed = read_delimited(&text, ',').unwrap();

    assert_eq!(parsed.columns, engine.rows().columns);
    assert_eq!(parsed.len(), engine.rows().len());
    assert_eq!(parsed.rows[2].values[2], Value::String("red, ripe".to_string()));
    assert_eq!(parsed.rows[1].values[2], Value::Null);
}

#[test]
fn test_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let engine = TableEngine::new(sample());

    engine.export_to_file(&path, ExportScope::View, ',').unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, engine.export(ExportScope::View, ',').unwrap());
}

#[test]
fn test_export_rejects_multibyte_delimiter() {
    let engine = TableEngine::new(sample());

    assert!(engine.export(ExportScope::All, '→').is_err());
}

#[test]
fn test_export_file_name() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

    assert_eq!(export_file_name("Satis_Trend", date), "Satis_Trend_2024-03-05.csv");
}
