use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::aggregate::PeriodSummary;
use super::monthly::MonthlyStatement;
use crate::error::ProjectionError;
use crate::types::*;
use crate::ProjectionResult;

/// Headline figures for the whole projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationSummary {
    pub months: u32,
    pub total_revenue: Money,
    pub total_net_income: Money,
    /// Sum of |interest_expense|, which includes amortisation
    pub total_interest: Money,
    pub total_depreciation: Money,
    pub final_cash: Money,
    pub final_debt: Money,
    pub average_ebitda: Money,
    pub average_ebitda_margin: Decimal,
    pub average_net_income_margin: Decimal,
    pub average_roe: Decimal,
    pub average_roa: Decimal,
}

/// Reduce the monthly, quarterly and annual series to headline totals.
pub fn summarize(
    monthly: &[MonthlyStatement],
    quarterly: &[PeriodSummary],
    annual: &[PeriodSummary],
) -> ProjectionResult<ComputationOutput<ConsolidationSummary>> {
    let start = Instant::now();

    let last = monthly
        .last()
        .ok_or_else(|| empty_series("monthly"))?;
    if quarterly.is_empty() {
        return Err(empty_series("quarterly"));
    }
    if annual.is_empty() {
        return Err(empty_series("annual"));
    }

    let summary = ConsolidationSummary {
        months: monthly.len() as u32,
        total_revenue: monthly.iter().map(|m| m.revenue).sum(),
        total_net_income: monthly.iter().map(|m| m.net_income).sum(),
        total_interest: monthly.iter().map(|m| m.interest_expense.abs()).sum(),
        total_depreciation: monthly.iter().map(|m| m.depreciation.abs()).sum(),
        final_cash: last.closing_cash,
        final_debt: last.total_debt,
        average_ebitda: mean(monthly.iter().map(|m| m.ebitda), monthly.len()),
        average_ebitda_margin: mean(quarterly.iter().map(|q| q.ebitda_margin), quarterly.len()),
        average_net_income_margin: mean(
            quarterly.iter().map(|q| q.net_income_margin),
            quarterly.len(),
        ),
        average_roe: mean(
            annual.iter().map(|a| a.return_on_equity.unwrap_or(Decimal::ZERO)),
            annual.len(),
        ),
        average_roa: mean(
            annual.iter().map(|a| a.return_on_assets.unwrap_or(Decimal::ZERO)),
            annual.len(),
        ),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Projection Summary (totals over months, margin averages over quarters, returns over years)",
        &serde_json::json!({
            "months": monthly.len(),
            "quarters": quarterly.len(),
            "years": annual.len(),
        }),
        Vec::new(),
        elapsed,
        summary,
    ))
}

fn empty_series(name: &str) -> ProjectionError {
    ProjectionError::Computation(format!("Cannot summarise an empty {name} series"))
}

/// Arithmetic mean; callers guarantee `len > 0`.
fn mean(values: impl Iterator<Item = Decimal>, len: usize) -> Decimal {
    values.sum::<Decimal>() / Decimal::from(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidation::aggregate::aggregate;
    use rust_decimal_macros::dec;

    fn flat_month(month_cum: u32) -> MonthlyStatement {
        let idx = MonthIndex::new(month_cum);
        let zero = Decimal::ZERO;
        MonthlyStatement {
            month_cum,
            year: idx.year,
            month: idx.month,
            month_name: idx.month_name().to_string(),
            revenue: dec!(100),
            cogs: dec!(-40),
            gross_profit: dec!(60),
            operating_expenses: dec!(-20),
            ebitda: dec!(40),
            depreciation: dec!(-10),
            ebit: dec!(30),
            interest_expense: dec!(-10),
            net_income_before_tax: dec!(20),
            tax_expense: dec!(-6),
            net_income: dec!(14),
            opening_cash: zero,
            change_in_receivables: zero,
            change_in_inventory: zero,
            change_in_other_current_assets: zero,
            change_in_payables: zero,
            operating_cash_flow: zero,
            capex: zero,
            investing_cash_flow: zero,
            debt_drawdowns: zero,
            debt_repayments: zero,
            financing_cash_flow: zero,
            net_cash_flow: zero,
            closing_cash: Decimal::from(month_cum),
            accounts_receivable: zero,
            inventory: zero,
            other_current_assets: zero,
            ppe: dec!(500),
            other_assets: zero,
            total_assets: dec!(1000),
            accounts_payable: zero,
            senior_debt: dec!(300),
            short_term_debt: zero,
            total_debt: dec!(300),
            equity: dec!(400),
            retained_earnings: dec!(100),
            total_liabilities_and_equity: dec!(800),
        }
    }

    #[test]
    fn test_totals_and_averages() {
        let monthly: Vec<MonthlyStatement> = (1..=24).map(flat_month).collect();
        let periods = aggregate(&monthly).unwrap().result;
        let s = summarize(&monthly, &periods.quarterly, &periods.annual)
            .unwrap()
            .result;

        assert_eq!(s.months, 24);
        assert_eq!(s.total_revenue, dec!(2400));
        assert_eq!(s.total_net_income, dec!(336));
        assert_eq!(s.total_interest, dec!(240));
        assert_eq!(s.total_depreciation, dec!(240));
        assert_eq!(s.final_cash, dec!(24));
        assert_eq!(s.final_debt, dec!(300));
        assert_eq!(s.average_ebitda, dec!(40));
        assert_eq!(s.average_ebitda_margin, dec!(40));
        assert_eq!(s.average_net_income_margin, dec!(14));
        // 168 / 500 and 168 / 1000
        assert_eq!(s.average_roe, dec!(33.6));
        assert_eq!(s.average_roa, dec!(16.8));
    }

    #[test]
    fn test_empty_series_is_an_error() {
        let monthly: Vec<MonthlyStatement> = (1..=12).map(flat_month).collect();
        let periods = aggregate(&monthly).unwrap().result;

        assert!(matches!(
            summarize(&[], &periods.quarterly, &periods.annual),
            Err(ProjectionError::Computation(_))
        ));
        assert!(summarize(&monthly, &[], &periods.annual).is_err());
        assert!(summarize(&monthly, &periods.quarterly, &[]).is_err());
    }
}
