use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::monthly::MonthlyStatement;
use crate::error::ProjectionError;
use crate::types::*;
use crate::ProjectionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Quarter,
    Year,
}

/// One quarter or one year rolled up from monthly statements.
///
/// Flows are summed over the period; balances are the last month's closing
/// figures. Ratios are percentages except `current_ratio` and
/// `debt_service_coverage`. The `Option` ratios are only computed for years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: String,
    pub kind: PeriodKind,
    pub year: u32,
    pub quarter: Option<u32>,
    pub first_month_cum: u32,
    pub last_month_cum: u32,

    // Flows
    pub revenue: Money,
    pub cogs: Money,
    pub gross_profit: Money,
    pub operating_expenses: Money,
    pub ebitda: Money,
    pub depreciation: Money,
    pub ebit: Money,
    pub interest_expense: Money,
    pub net_income_before_tax: Money,
    pub tax_expense: Money,
    pub net_income: Money,
    pub operating_cash_flow: Money,
    pub capex: Money,
    pub investing_cash_flow: Money,
    pub debt_drawdowns: Money,
    pub debt_repayments: Money,
    pub financing_cash_flow: Money,
    pub net_cash_flow: Money,

    // Cash bridge
    pub opening_cash: Money,
    pub closing_cash: Money,

    // Balances
    pub accounts_receivable: Money,
    pub inventory: Money,
    pub other_current_assets: Money,
    pub ppe: Money,
    pub total_assets: Money,
    pub accounts_payable: Money,
    pub senior_debt: Money,
    pub short_term_debt: Money,
    pub total_debt: Money,
    pub equity: Money,
    pub retained_earnings: Money,
    pub total_liabilities_and_equity: Money,

    // Ratios
    pub gross_margin: Decimal,
    pub ebitda_margin: Decimal,
    pub net_income_margin: Decimal,
    pub debt_to_equity: Decimal,
    pub current_ratio: Decimal,
    pub return_on_equity: Option<Decimal>,
    pub return_on_assets: Option<Decimal>,
    pub debt_to_assets: Option<Decimal>,
    pub working_capital: Option<Money>,
    pub debt_service_coverage: Option<Decimal>,
    pub loan_to_value: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedPeriods {
    pub quarterly: Vec<PeriodSummary>,
    pub annual: Vec<PeriodSummary>,
}

/// Roll monthly statements into quarters and years.
pub fn aggregate(
    monthly: &[MonthlyStatement],
) -> ProjectionResult<ComputationOutput<AggregatedPeriods>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate_months(monthly)?;

    let quarterly: Vec<PeriodSummary> = monthly
        .chunks(MONTHS_PER_QUARTER as usize)
        .map(|months| summarize_period(months, PeriodKind::Quarter))
        .collect();
    let annual: Vec<PeriodSummary> = monthly
        .chunks(MONTHS_PER_YEAR as usize)
        .map(|months| summarize_period(months, PeriodKind::Year))
        .collect();

    tracing::debug!(
        quarters = quarterly.len(),
        years = annual.len(),
        "period aggregation complete"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Quarterly and Annual Roll-Up (flows summed, balances at period end)",
        &serde_json::json!({ "months": monthly.len() }),
        warnings,
        elapsed,
        AggregatedPeriods { quarterly, annual },
    ))
}

fn validate_months(monthly: &[MonthlyStatement]) -> ProjectionResult<()> {
    if monthly.is_empty() {
        return Err(ProjectionError::invalid(
            "monthly",
            "At least one year of monthly statements is required",
        ));
    }
    if monthly.len() % MONTHS_PER_YEAR as usize != 0 {
        return Err(ProjectionError::invalid(
            "monthly",
            format!(
                "Monthly series must cover whole years, got {} months",
                monthly.len()
            ),
        ));
    }
    for (i, row) in monthly.iter().enumerate() {
        if row.month_cum as usize != i + 1 {
            return Err(ProjectionError::invalid(
                "monthly",
                format!("Row {} has month_cum {}; expected {}", i, row.month_cum, i + 1),
            ));
        }
    }
    Ok(())
}

fn summarize_period(months: &[MonthlyStatement], kind: PeriodKind) -> PeriodSummary {
    // Chunks are never empty
    let first = &months[0];
    let last = &months[months.len() - 1];
    let sum = |f: fn(&MonthlyStatement) -> Money| -> Money { months.iter().map(f).sum() };

    let revenue = sum(|m| m.revenue);
    let gross_profit = sum(|m| m.gross_profit);
    let ebitda = sum(|m| m.ebitda);
    let interest_expense = sum(|m| m.interest_expense);
    let net_income = sum(|m| m.net_income);

    let book_equity = last.equity + last.retained_earnings;
    let current_assets =
        last.closing_cash + last.accounts_receivable + last.inventory + last.other_current_assets;
    let current_liabilities = last.accounts_payable + last.short_term_debt;
    let hundred = Decimal::ONE_HUNDRED;

    let (period, quarter) = match kind {
        PeriodKind::Quarter => {
            let q = MonthIndex::new(first.month_cum).quarter();
            (format!("Y{}-Q{}", first.year, q), Some(q))
        }
        PeriodKind::Year => (format!("Y{}", first.year), None),
    };

    let annual_only = |value: Decimal| match kind {
        PeriodKind::Year => Some(value),
        PeriodKind::Quarter => None,
    };

    PeriodSummary {
        period,
        kind,
        year: first.year,
        quarter,
        first_month_cum: first.month_cum,
        last_month_cum: last.month_cum,

        revenue,
        cogs: sum(|m| m.cogs),
        gross_profit,
        operating_expenses: sum(|m| m.operating_expenses),
        ebitda,
        depreciation: sum(|m| m.depreciation),
        ebit: sum(|m| m.ebit),
        interest_expense,
        net_income_before_tax: sum(|m| m.net_income_before_tax),
        tax_expense: sum(|m| m.tax_expense),
        net_income,
        operating_cash_flow: sum(|m| m.operating_cash_flow),
        capex: sum(|m| m.capex),
        investing_cash_flow: sum(|m| m.investing_cash_flow),
        debt_drawdowns: sum(|m| m.debt_drawdowns),
        debt_repayments: sum(|m| m.debt_repayments),
        financing_cash_flow: sum(|m| m.financing_cash_flow),
        net_cash_flow: sum(|m| m.net_cash_flow),

        opening_cash: first.opening_cash,
        closing_cash: last.closing_cash,

        accounts_receivable: last.accounts_receivable,
        inventory: last.inventory,
        other_current_assets: last.other_current_assets,
        ppe: last.ppe,
        total_assets: last.total_assets,
        accounts_payable: last.accounts_payable,
        senior_debt: last.senior_debt,
        short_term_debt: last.short_term_debt,
        total_debt: last.total_debt,
        equity: last.equity,
        retained_earnings: last.retained_earnings,
        total_liabilities_and_equity: last.total_liabilities_and_equity,

        gross_margin: safe_divide(gross_profit, revenue) * hundred,
        ebitda_margin: safe_divide(ebitda, revenue) * hundred,
        net_income_margin: safe_divide(net_income, revenue) * hundred,
        debt_to_equity: safe_divide(last.total_debt, book_equity) * hundred,
        current_ratio: safe_divide(current_assets, current_liabilities),
        return_on_equity: annual_only(safe_divide(net_income, book_equity) * hundred),
        return_on_assets: annual_only(safe_divide(net_income, last.total_assets) * hundred),
        debt_to_assets: annual_only(safe_divide(last.total_debt, last.total_assets) * hundred),
        working_capital: annual_only(current_assets - current_liabilities),
        debt_service_coverage: annual_only(safe_divide(ebitda, interest_expense.abs())),
        loan_to_value: annual_only(safe_divide(last.total_debt, last.ppe) * hundred),
    }
}
