// Parameter extraction and binding tests
// Author: Gabriel Demetrios Lafis

use chrono::NaiveDate;
use serde_json::json;

use rust_report_engine::report::{
    extract_parameters, render_template, validate_binding, ParameterBinder, ParameterBinding,
    ParameterExtractor, ParameterKind, ParameterSpec, ReportDefinition, ValidationError,
};

fn binder() -> ParameterBinder {
    ParameterBinder::for_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
}

fn binding(pairs: &[(&str, &str)]) -> ParameterBinding {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_extract_first_occurrence_order() {
    let template = "SELECT * FROM t WHERE b = '{BETA}' AND a = '{ALPHA}' OR b = '{BETA}' AND c = {GAMMA}";

    assert_eq!(extract_parameters(template), vec!["BETA", "ALPHA", "GAMMA"]);
}

#[test]
fn test_extract_skips_system_placeholders() {
    let template = "SELECT * FROM {TABLE_NAME} WHERE d >= '{START_DATE}' AND d < '{END_DATE}'";

    let names = extract_parameters(template);

    assert_eq!(names, vec!["START_DATE", "END_DATE"]);
    assert!(!names.iter().any(|n| n == "TABLE_NAME"));
}

#[test]
fn test_extract_without_placeholders() {
    assert!(extract_parameters("SELECT 1").is_empty());
    assert!(extract_parameters("").is_empty());
    // lowercase and mixed tokens are not placeholders
    assert!(extract_parameters("SELECT '{start}', '{Mixed_Case}', '{1}'").is_empty());
}

#[test]
fn test_extract_custom_exclusions() {
    let extractor = ParameterExtractor::with_excluded(&["TABLE_NAME", "SCHEMA"]);

    let names = extractor.extract("SELECT * FROM {SCHEMA}.{TABLE_NAME} WHERE x = '{REGION}'");

    assert_eq!(names, vec!["REGION"]);
}

#[test]
fn test_discover_skips_known_parameters() {
    let template = "SELECT * FROM {TABLE_NAME} WHERE d BETWEEN '{START_DATE}' AND '{END_DATE}'";
    let known = vec![ParameterSpec::new("START_DATE", ParameterKind::Date)];

    let discovered = ParameterExtractor::new().discover(template, &known);

    assert_eq!(discovered, vec!["END_DATE"]);
}

#[test]
fn test_detect_into_appends_with_inferred_kind() {
    let mut report = ReportDefinition::new(
        "Satis_Raporu",
        "SELECT * FROM s WHERE d > '{START_DATE}' AND region = '{REGION}' AND d < '{UPDATE_DATE}'",
    );
    report
        .parameters
        .push(ParameterSpec::new("START_DATE", ParameterKind::Date));

    let added = ParameterExtractor::new().detect_into(&mut report);

    assert_eq!(added, vec!["REGION", "UPDATE_DATE"]);
    assert_eq!(report.parameters.len(), 3);
    assert_eq!(report.parameter("REGION").unwrap().kind, ParameterKind::Text);
    assert_eq!(report.parameter("UPDATE_DATE").unwrap().kind, ParameterKind::Date);

    // a second pass finds nothing new
    assert!(ParameterExtractor::new().detect_into(&mut report).is_empty());
}

#[test]
fn test_render_template_doubles_quotes() {
    let template = "SELECT * FROM {TABLE_NAME} WHERE name = '{CUSTOMER}' AND d > '{START_DATE}'";
    let values = binding(&[("CUSTOMER", "O'Brien"), ("START_DATE", "2024-03-08")]);

    let rendered = render_template(template, &values);

    assert_eq!(
        rendered,
        "SELECT * FROM {TABLE_NAME} WHERE name = 'O''Brien' AND d > '2024-03-08'"
    );
}

#[test]
fn test_bind_date_defaults() {
    let specs = vec![
        ParameterSpec::new("START_DATE", ParameterKind::Date),
        ParameterSpec::new("END_DATE", ParameterKind::Date),
        ParameterSpec::new("REPORT_DATE", ParameterKind::Date),
        ParameterSpec::new("START_TIME", ParameterKind::Datetime),
    ];

    let bound = binder().bind(&specs, &ParameterBinding::new());

    assert_eq!(bound["START_DATE"], "2024-03-08");
    assert_eq!(bound["END_DATE"], "2024-03-15");
    assert_eq!(bound["REPORT_DATE"], "2024-03-15");
    assert_eq!(bound["START_TIME"], "2024-03-08");
}

#[test]
fn test_bind_every_spec_present() {
    let specs = vec![
        ParameterSpec::new("REGION", ParameterKind::Text).with_default("north"),
        ParameterSpec::new("LIMIT", ParameterKind::Number),
        ParameterSpec::new("STATUS", ParameterKind::Select).with_options(&["open", "closed"]),
        ParameterSpec::new("START_DATE", ParameterKind::Date).required(),
    ];

    let bound = binder().bind(&specs, &ParameterBinding::new());

    assert_eq!(bound.len(), specs.len());
    assert_eq!(bound["REGION"], "north");
    assert_eq!(bound["LIMIT"], "");
    assert_eq!(bound["STATUS"], "");
    assert!(NaiveDate::parse_from_str(&bound["START_DATE"], "%Y-%m-%d").is_ok());
}

#[test]
fn test_bind_prefers_previous_values() {
    let specs = vec![
        ParameterSpec::new("START_DATE", ParameterKind::Date),
        ParameterSpec::new("REGION", ParameterKind::Text).with_default("north"),
    ];
    let previous = binding(&[("REGION", "south"), ("OBSOLETE", "x")]);

    let bound = binder().bind(&specs, &previous);

    assert_eq!(bound["REGION"], "south");
    assert_eq!(bound["START_DATE"], "2024-03-08");
    assert!(!bound.contains_key("OBSOLETE"));
}

#[test]
fn test_reset_discards_edits() {
    let specs = vec![ParameterSpec::new("REGION", ParameterKind::Text).with_default("north")];

    let bound = binder().reset(&specs);

    assert_eq!(bound, binding(&[("REGION", "north")]));
}

#[test]
fn test_validate_required() {
    let specs = vec![
        ParameterSpec::new("START_DATE", ParameterKind::Date).required(),
        ParameterSpec::new("REGION", ParameterKind::Text).required(),
        ParameterSpec::new("NOTE", ParameterKind::Text),
    ];

    let err = validate_binding(&specs, &binding(&[("START_DATE", "2024-01-01"), ("REGION", "  ")])).unwrap_err();
    assert_eq!(err, ValidationError::MissingRequired("REGION".to_string()));
    assert_eq!(err.parameter(), "REGION");
    assert!(err.to_string().contains("REGION"));

    // optional parameters may stay blank
    assert!(validate_binding(&specs, &binding(&[("START_DATE", "2024-01-01"), ("REGION", "x")])).is_ok());
}

#[test]
fn test_validate_typed_values() {
    let specs = vec![
        ParameterSpec::new("LIMIT", ParameterKind::Number),
        ParameterSpec::new("START_DATE", ParameterKind::Date),
        ParameterSpec::new("STATUS", ParameterKind::Select).with_options(&["open", "closed"]),
        ParameterSpec::new("TAGS", ParameterKind::Multiselect).with_options(&["a", "b", "c"]),
    ];

    let ok = binding(&[("LIMIT", "10.5"), ("START_DATE", "2024-02-29"), ("STATUS", "open"), ("TAGS", "a, c")]);
    assert!(validate_binding(&specs, &ok).is_ok());

    let cases = [
        ("LIMIT", "ten"),
        ("START_DATE", "2024-02-30"),
        ("STATUS", "pending"),
        ("TAGS", "a,d"),
    ];
    for (name, value) in cases {
        let mut values = ok.clone();
        values.insert(name.to_string(), value.to_string());

        match validate_binding(&specs, &values) {
            Err(ValidationError::InvalidValue { name: bad, .. }) => assert_eq!(bad, name),
            other => panic!("expected invalid {}, got {:?}", name, other),
        }
    }
}

#[test]
fn test_report_from_details() {
    let details = json!({
        "display_name": "Sales by Day",
        "description": "Daily sales",
        "category": "sales",
        "sql": "SELECT * FROM {TABLE_NAME} WHERE d >= '{START_DATE}' AND r = '{REGION}'",
        "parameters": {"START_DATE": null, "REGION": "north", "LIMIT": 100}
    });

    let report = ReportDefinition::from_details("Satis_Gunluk", &details);

    assert_eq!(report.id, "Satis_Gunluk");
    assert_eq!(report.display_name, "Sales by Day");
    assert!(report.query_template.contains("{START_DATE}"));

    let names: Vec<&str> = report.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["START_DATE", "REGION", "LIMIT"]);
    assert_eq!(report.parameters[0].kind, ParameterKind::Date);
    assert_eq!(report.parameters[0].default_value, None);
    assert_eq!(report.parameters[1].default_value.as_deref(), Some("north"));
    assert_eq!(report.parameters[2].default_value.as_deref(), Some("100"));
}

#[test]
fn test_report_from_details_fallbacks() {
    let report = ReportDefinition::from_details("Bare", &json!({"sql_query": "SELECT 1"}));

    assert_eq!(report.display_name, "Bare");
    assert_eq!(report.query_template, "SELECT 1");
    assert!(report.parameters.is_empty());
}
