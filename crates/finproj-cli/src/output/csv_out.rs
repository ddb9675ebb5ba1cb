use serde_json::Value;
use std::io;

use super::{format_scalar, primary_rows, result_of, scalar_fields};

/// Write the main row series as CSV to stdout, or `field,value` pairs when
/// the result has no rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = result_of(value);

    if let Err(e) = write_csv(&mut wtr, result).and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> Result<(), csv::Error> {
    if let Some(rows) = primary_rows(result) {
        return write_rows(wtr, rows);
    }

    wtr.write_record(["field", "value"])?;
    for (key, val) in scalar_fields(result) {
        wtr.write_record([key, format_scalar(val)])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for row in rows {
        if let Value::Object(map) = row {
            wtr.write_record(
                headers
                    .iter()
                    .map(|h| map.get(*h).map(format_scalar).unwrap_or_default()),
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, result_of(value)).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_schedule_rows_become_records() {
        let value = json!({"result": {"rows": [
            {"month_cum": 1, "closing_balance": "48958.33"},
            {"month_cum": 2, "closing_balance": "47916.66"}
        ]}});
        assert_eq!(
            render(&value),
            "month_cum,closing_balance\n1,48958.33\n2,47916.66\n"
        );
    }

    #[test]
    fn test_scalar_result_becomes_pairs() {
        let value = json!({"result": {"final_cash": "100"}});
        assert_eq!(render(&value), "field,value\nfinal_cash,100\n");
    }
}
