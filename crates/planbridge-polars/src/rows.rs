//! Row-oriented (NDJSON) and column-oriented (JSON) frame construction.

use planbridge_core::{BridgeError, Result};
use polars::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Number, Value as JsonValue};

/// Parse newline-delimited JSON objects into a frame.
///
/// Column order is first-seen key order; keys missing from a row are null.
/// Each column's dtype is inferred from its values. Empty (or all-blank) input
/// yields `None`, meaning "no input frame".
pub fn frame_from_ndjson(bytes: &[u8]) -> Result<Option<DataFrame>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| BridgeError::InvalidArgument(format!("row input is not UTF-8: {e}")))?;

    let mut names: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<AnyValue<'static>>> = Vec::new();
    let mut height = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: Map<String, JsonValue> = serde_json::from_str(line).map_err(|e| {
            BridgeError::InvalidArgument(format!("line {}: expected a JSON object: {e}", line_no + 1))
        })?;
        for (key, value) in row {
            let idx = match names.iter().position(|n| *n == key) {
                Some(idx) => idx,
                None => {
                    names.push(key.clone());
                    columns.push(vec![AnyValue::Null; height]);
                    names.len() - 1
                }
            };
            columns[idx].push(json_to_any_value(&value, &key)?);
        }
        height += 1;
        for column in &mut columns {
            if column.len() < height {
                column.push(AnyValue::Null);
            }
        }
    }

    if names.is_empty() {
        return Ok(None);
    }
    let columns = names
        .iter()
        .zip(columns.iter())
        .map(|(name, values)| column_from_values(name, values))
        .collect::<Result<Vec<Column>>>()?;
    DataFrame::new(columns)
        .map(Some)
        .map_err(|e| BridgeError::InvalidArgument(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ColumnSpec {
    name: String,
    values: Vec<JsonValue>,
}

/// Build a frame from `[{"name": ..., "values": [...]}, ...]`.
///
/// Requires at least one column, equal lengths and unique names. Values may be
/// null; each column's dtype is inferred.
pub fn frame_from_columns_json(bytes: &[u8]) -> Result<DataFrame> {
    let specs: Vec<ColumnSpec> = serde_json::from_slice(bytes)?;
    let first = specs
        .first()
        .ok_or_else(|| BridgeError::InvalidArgument("at least one column is required".into()))?;
    let height = first.values.len();

    let mut columns = Vec::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        if specs[..i].iter().any(|s| s.name == spec.name) {
            return Err(BridgeError::InvalidArgument(format!(
                "duplicate column name {:?}",
                spec.name
            )));
        }
        if spec.values.len() != height {
            return Err(BridgeError::InvalidArgument(format!(
                "column {:?} has {} values, expected {height}",
                spec.name,
                spec.values.len()
            )));
        }
        let values = spec
            .values
            .iter()
            .map(|v| json_to_any_value(v, &spec.name))
            .collect::<Result<Vec<_>>>()?;
        columns.push(column_from_values(&spec.name, &values)?);
    }
    DataFrame::new(columns).map_err(|e| BridgeError::InvalidArgument(e.to_string()))
}

/// Scalar kind of a JSON value; integers and floats share one kind.
fn kind_of(value: &AnyValue<'_>) -> Option<&'static str> {
    match value {
        AnyValue::Null => None,
        AnyValue::Boolean(_) => Some("boolean"),
        AnyValue::String(_) | AnyValue::StringOwned(_) => Some("string"),
        _ => Some("number"),
    }
}

/// Infer a column's dtype. Integers widen to floats when both appear; any
/// other mix of kinds is rejected rather than coerced.
fn column_from_values(name: &str, values: &[AnyValue<'static>]) -> Result<Column> {
    let mut kinds = values.iter().filter_map(kind_of);
    if let Some(first) = kinds.next() {
        if let Some(other) = kinds.find(|k| *k != first) {
            return Err(BridgeError::InvalidArgument(format!(
                "column {name:?} mixes {first} and {other} values"
            )));
        }
    }
    Series::from_any_values(name.into(), values, false)
        .map(Column::from)
        .map_err(|e| BridgeError::InvalidArgument(format!("column {name:?}: {e}")))
}

fn json_to_any_value(value: &JsonValue, column: &str) -> Result<AnyValue<'static>> {
    Ok(match value {
        JsonValue::Null => AnyValue::Null,
        JsonValue::Bool(b) => AnyValue::Boolean(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                AnyValue::Int64(i)
            } else if n.is_u64() {
                return Err(BridgeError::InvalidArgument(format!(
                    "column {column:?}: integer {n} is outside the Int64 range"
                )));
            } else {
                AnyValue::Float64(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => AnyValue::StringOwned(s.as_str().into()),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            return Err(BridgeError::InvalidArgument(format!(
                "column {column:?}: nested values are not supported"
            )));
        }
    })
}

/// Encode a frame as NDJSON: one object per row, keys in column order.
pub fn frame_to_ndjson(df: &DataFrame) -> Result<Vec<u8>> {
    let columns = df.get_columns();
    let mut out = Vec::new();
    for i in 0..df.height() {
        let mut row = Map::with_capacity(columns.len());
        for c in columns {
            let av = c
                .get(i)
                .map_err(|e| BridgeError::Execution(format!("reading row {i}: {e}")))?;
            row.insert(c.name().to_string(), any_value_to_json(av));
        }
        serde_json::to_writer(&mut out, &JsonValue::Object(row))
            .map_err(|e| BridgeError::Execution(format!("encoding row {i}: {e}")))?;
        out.push(b'\n');
    }
    Ok(out)
}

/// Convert a Polars value to JSON. Numbers and strings map directly, lists
/// become arrays, and temporal or other values use their display form.
pub fn any_value_to_json(av: AnyValue<'_>) -> JsonValue {
    match av {
        AnyValue::Null => JsonValue::Null,
        AnyValue::Boolean(b) => JsonValue::Bool(b),
        AnyValue::Int8(i) => JsonValue::Number(Number::from(i)),
        AnyValue::Int16(i) => JsonValue::Number(Number::from(i)),
        AnyValue::Int32(i) => JsonValue::Number(Number::from(i)),
        AnyValue::Int64(i) => JsonValue::Number(Number::from(i)),
        AnyValue::UInt8(u) => JsonValue::Number(Number::from(u)),
        AnyValue::UInt16(u) => JsonValue::Number(Number::from(u)),
        AnyValue::UInt32(u) => JsonValue::Number(Number::from(u)),
        AnyValue::UInt64(u) => JsonValue::Number(Number::from(u)),
        AnyValue::Float32(f) => Number::from_f64(f64::from(f))
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        AnyValue::Float64(f) => Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        AnyValue::String(s) => JsonValue::String(s.to_string()),
        AnyValue::StringOwned(s) => JsonValue::String(s.to_string()),
        AnyValue::List(s) => JsonValue::Array(
            (0..s.len())
                .map(|i| s.get(i).map(any_value_to_json).unwrap_or(JsonValue::Null))
                .collect(),
        ),
        other => JsonValue::String(other.to_string()),
    }
}
