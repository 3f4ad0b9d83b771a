// JSON normalization of backend result payloads
// Author: Gabriel Demetrios Lafis

use serde_json::{Map, Value as JsonValue};

use super::{DataError, Row, RowSet, Value};

/// Convert a JSON scalar into a cell value.
///
/// Nested arrays and objects are not part of the cell model; they are kept
/// as their compact JSON text.
pub fn value_from_json(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}

/// Convert a cell value back into JSON
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Integer(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
    }
}

/// Normalize a `results` array of row objects into a [`RowSet`].
///
/// Columns come from the first row, in key order. Keys missing from a later
/// row read as null and keys that only appear in later rows are dropped.
/// `null` (the backend's "no results") yields an empty row set.
pub fn rowset_from_json(results: &JsonValue) -> Result<RowSet, DataError> {
    let items = match results {
        JsonValue::Null => return Ok(RowSet::default()),
        JsonValue::Array(items) => items,
        other => {
            return Err(DataError::Malformed(format!(
                "expected an array of rows, got {}",
                json_kind(other)
            )))
        }
    };

    let first = match items.first() {
        Some(first) => as_object(first, 0)?,
        None => return Ok(RowSet::default()),
    };

    let columns: Vec<String> = first.keys().cloned().collect();
    let mut rowset = RowSet::new(columns);

    for (index, item) in items.iter().enumerate() {
        let object = as_object(item, index)?;
        let values = rowset
            .columns
            .iter()
            .map(|column| object.get(column).map(value_from_json).unwrap_or(Value::Null))
            .collect();
        rowset.add_row(Row::new(values))?;
    }

    Ok(rowset)
}

/// Render a row set as an array of row objects, preserving column order
pub fn rowset_to_json(rowset: &RowSet) -> JsonValue {
    let rows = rowset
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, JsonValue> = rowset
                .columns
                .iter()
                .zip(row.values.iter())
                .map(|(column, value)| (column.clone(), value_to_json(value)))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    JsonValue::Array(rows)
}

fn as_object(item: &JsonValue, index: usize) -> Result<&Map<String, JsonValue>, DataError> {
    item.as_object().ok_or_else(|| {
        DataError::Malformed(format!(
            "row {} is {}, expected an object",
            index,
            json_kind(item)
        ))
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
