//! Delimited-text export of any output series.
//!
//! The header row is the field names of the record type in declaration order;
//! every following line is one record's values in the same order, comma-joined
//! and `\n`-terminated.

use serde::{Deserialize, Serialize};
use std::io;

use crate::ProjectionResult;

/// Write `rows` as delimited text to `writer`. Nothing is written for an empty
/// slice.
pub fn write_delimited<T: Serialize, W: io::Write>(rows: &[T], writer: W) -> ProjectionResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()
        .map_err(|e| crate::error::ProjectionError::SerializationError(e.to_string()))?;
    Ok(())
}

/// Render `rows` as a delimited-text string.
pub fn to_delimited<T: Serialize>(rows: &[T]) -> ProjectionResult<String> {
    let mut buf = Vec::new();
    write_delimited(rows, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| crate::error::ProjectionError::SerializationError(e.to_string()))
}

/// The series a projection run can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    SeniorDebt,
    ShortTermDebt,
    Depreciation,
    Monthly,
    Quarterly,
    Annual,
}

#[cfg(feature = "pipeline")]
pub fn export_series(
    output: &crate::pipeline::ProjectionOutput,
    series: Series,
) -> ProjectionResult<String> {
    match series {
        Series::SeniorDebt => debt_rows(output.senior_debt.as_ref()),
        Series::ShortTermDebt => debt_rows(output.short_term_debt.as_ref()),
        Series::Depreciation => to_delimited(&output.depreciation.rows),
        Series::Monthly => to_delimited(&output.monthly),
        Series::Quarterly => to_delimited(&output.quarterly),
        Series::Annual => to_delimited(&output.annual),
    }
}

#[cfg(feature = "pipeline")]
fn debt_rows(schedule: Option<&crate::schedules::debt::DebtScheduleOutput>) -> ProjectionResult<String> {
    match schedule {
        Some(s) => to_delimited(&s.rows),
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[derive(Serialize)]
    struct Row {
        month_cum: u32,
        opening_balance: Decimal,
        label: Option<String>,
    }

    #[test]
    fn test_header_follows_declaration_order() {
        let rows = vec![
            Row {
                month_cum: 1,
                opening_balance: dec!(100.5),
                label: Some("a".into()),
            },
            Row {
                month_cum: 2,
                opening_balance: dec!(90),
                label: None,
            },
        ];
        let text = to_delimited(&rows).unwrap();
        assert_eq!(
            text,
            "month_cum,opening_balance,label\n1,100.5,a\n2,90,\n"
        );
    }

    #[test]
    fn test_empty_series_is_empty_text() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(to_delimited(&rows).unwrap(), "");
    }

    #[test]
    fn test_series_names() {
        let s: Series = serde_json::from_str("\"short_term_debt\"").unwrap();
        assert_eq!(s, Series::ShortTermDebt);
    }
}
