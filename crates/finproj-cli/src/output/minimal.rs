use serde_json::Value;

use super::{format_scalar, result_of};

/// Headline figures in order of priority; the first one present is printed.
const PRIORITY_KEYS: [&str; 6] = [
    "final_cash",
    "total_net_income",
    "total_interest",
    "total_depreciation",
    "closing_cash",
    "closing_balance",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(result_of(value)));
}

fn minimal_answer(result: &Value) -> String {
    // Consolidated runs carry their headline figures in `summary`; a bare
    // series answers with its last row.
    let headline = result
        .get("summary")
        .or_else(|| result.as_array().and_then(|rows| rows.last()))
        .unwrap_or(result);

    if let Value::Object(map) = headline {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return format_scalar(val);
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(headline)
}
