use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_scalar, primary_rows, result_of, scalar_fields};

/// Format output as tables: headline fields first, then the main row series.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    let fields = scalar_fields(result);
    if !fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &fields {
            builder.push_record([key.clone(), format_scalar(val)]);
        }
        println!("{}", Table::from(builder));
    }

    match primary_rows(result) {
        Some(rows) => print_rows(rows),
        None if fields.is_empty() => println!("{}", format_scalar(result)),
        None => {}
    }

    print_envelope_notes(value);
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(no rows)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        if let Value::Object(map) = row {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(value: &Value) {
    let envelope = value.get("output").unwrap_or(value);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::Array(failures)) = value.pointer("/persistence/failures") {
        if !failures.is_empty() {
            println!("\nNot saved:");
            for f in failures {
                let target = f.get("target").map(format_scalar).unwrap_or_default();
                let reason = f.get("reason").map(format_scalar).unwrap_or_default();
                println!("  - {}: {}", target, reason);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
