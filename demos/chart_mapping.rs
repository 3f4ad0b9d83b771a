// Chart mapping example
// Author: Gabriel Demetrios Lafis

use rust_report_engine::{
    chart::{ChartFamily, ChartMapper, SeriesColor},
    data::rowset_from_json,
    report::{render_template, ParameterBinder, ParameterExtractor, ParameterKind, ParameterSpec},
    table::{ExportScope, TableEngine},
};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Discover the parameters of a template
    let template = "SELECT day, visits, signups FROM {TABLE_NAME} \
                    WHERE day BETWEEN '{START_DATE}' AND '{END_DATE}' AND source = '{SOURCE}'";
    let names = ParameterExtractor::new().extract(template);
    println!("Parameters: {:?}", names);

    // Bind defaults
    let specs: Vec<ParameterSpec> = names
        .iter()
        .map(|name| ParameterSpec::new(name, ParameterKind::infer_from_name(name)))
        .collect();
    let mut binding = ParameterBinder::new().bind(&specs, &Default::default());
    binding.insert("SOURCE".to_string(), "newsletter".to_string());
    println!("Query: {}", render_template(template, &binding));

    // Rows as the report service returns them
    let rows = rowset_from_json(&json!([
        {"day": "2024-03-01", "visits": 120, "signups": 8},
        {"day": "2024-03-02", "visits": 98, "signups": 5},
        {"day": "2024-03-03", "visits": 143, "signups": 11},
    ]))?;

    let mapper = ChartMapper::new();
    for family in ChartFamily::ALL {
        if let Some(chart) = mapper.map(&rows, family) {
            println!("\n{} chart, labels from '{}'", chart.chart_family, chart.label_key);
            for series in &chart.series {
                let color = match &series.color {
                    SeriesColor::Uniform(color) => color.clone(),
                    SeriesColor::PerPoint(colors) => format!("{} colors", colors.len()),
                };
                println!("  {:<8} {:?} ({})", series.name, series.values, color);
            }
        }
    }

    // Sorted table export
    let mut table = TableEngine::new(rows);
    table.toggle_sort("visits");
    table.toggle_sort("visits");
    println!("\n{}", table.export(ExportScope::View, ',')?);

    Ok(())
}
