pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Unwrap the `result` of a computation envelope, and of a saved run's
/// `output` envelope.
pub(crate) fn result_of(value: &Value) -> &Value {
    let inner = value.get("output").unwrap_or(value);
    inner.get("result").unwrap_or(inner)
}

/// The row series worth tabulating: a bare array, a schedule's `rows`, or
/// the annual roll-up of a consolidation.
pub(crate) fn primary_rows(result: &Value) -> Option<&Vec<Value>> {
    match result {
        Value::Array(rows) => Some(rows),
        Value::Object(map) => ["rows", "annual"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

/// Scalar fields of an object, plus those of a nested `summary`.
pub(crate) fn scalar_fields(result: &Value) -> Vec<(String, &Value)> {
    let mut fields = Vec::new();
    if let Value::Object(map) = result {
        push_scalars(&mut fields, "", map);
        if let Some(Value::Object(summary)) = map.get("summary") {
            push_scalars(&mut fields, "summary.", summary);
        }
    }
    fields
}

fn push_scalars<'a>(fields: &mut Vec<(String, &'a Value)>, prefix: &str, map: &'a Map<String, Value>) {
    for (key, val) in map {
        if !val.is_array() && !val.is_object() {
            fields.push((format!("{prefix}{key}"), val));
        }
    }
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
