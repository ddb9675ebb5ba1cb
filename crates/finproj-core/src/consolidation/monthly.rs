use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::inputs::{self, BalanceSheetBaseline, ConsolidationInput, ResolvedInputs};
use crate::config::EngineConfig;
use crate::error::ProjectionError;
use crate::schedules::debt::DebtScheduleRow;
use crate::types::*;
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One consolidated month: P&L, cash flow and closing balance sheet.
///
/// Costs, depreciation, interest and tax are negative. The four `change_in_*`
/// working-capital fields are `prior − current`, so growth in an asset shows as
/// a negative (cash-absorbing) figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStatement {
    pub month_cum: u32,
    pub year: u32,
    pub month: u32,
    pub month_name: String,

    // Profit & loss
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

    // Cash flow
    pub opening_cash: Money,
    pub change_in_receivables: Money,
    pub change_in_inventory: Money,
    pub change_in_other_current_assets: Money,
    pub change_in_payables: Money,
    pub operating_cash_flow: Money,
    pub capex: Money,
    pub investing_cash_flow: Money,
    pub debt_drawdowns: Money,
    pub debt_repayments: Money,
    pub financing_cash_flow: Money,
    pub net_cash_flow: Money,
    pub closing_cash: Money,

    // Balance sheet
    pub accounts_receivable: Money,
    pub inventory: Money,
    pub other_current_assets: Money,
    pub ppe: Money,
    pub other_assets: Money,
    pub total_assets: Money,
    pub accounts_payable: Money,
    pub senior_debt: Money,
    pub short_term_debt: Money,
    pub total_debt: Money,
    pub equity: Money,
    pub retained_earnings: Money,
    pub total_liabilities_and_equity: Money,
}

// ---------------------------------------------------------------------------
// Fold state
// ---------------------------------------------------------------------------

/// Balances carried from one month into the next.
#[derive(Debug, Clone, PartialEq)]
struct CarryState {
    cash: Money,
    accounts_receivable: Money,
    inventory: Money,
    other_current_assets: Money,
    accounts_payable: Money,
    retained_earnings: Money,
}

impl CarryState {
    fn opening(baseline: &BalanceSheetBaseline) -> Self {
        Self {
            cash: baseline.cash,
            accounts_receivable: baseline.accounts_receivable,
            inventory: baseline.inventory,
            other_current_assets: baseline.other_current_assets,
            accounts_payable: baseline.accounts_payable,
            retained_earnings: baseline.retained_earnings,
        }
    }

    fn closing(row: &MonthlyStatement) -> Self {
        Self {
            cash: row.closing_cash,
            accounts_receivable: row.accounts_receivable,
            inventory: row.inventory,
            other_current_assets: row.other_current_assets,
            accounts_payable: row.accounts_payable,
            retained_earnings: row.retained_earnings,
        }
    }
}

/// One instrument's contribution to a month. Past the end of its schedule an
/// instrument has no flows and keeps its final closing balance.
#[derive(Debug, Clone, Copy, Default)]
struct DebtMonth {
    interest: Money,
    amortisation: Money,
    additional_loan: Money,
    repayment: Money,
    closing_balance: Money,
}

impl DebtMonth {
    fn lookup(rows: &[DebtScheduleRow], month_cum: u32) -> Self {
        match rows.get(month_cum as usize - 1) {
            Some(r) => DebtMonth {
                interest: r.interest,
                amortisation: r.amortisation,
                additional_loan: r.additional_loan,
                repayment: r.repayment,
                closing_balance: r.closing_balance,
            },
            None => DebtMonth {
                closing_balance: rows.last().map_or(Decimal::ZERO, |r| r.closing_balance),
                ..DebtMonth::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Consolidate baseline, assumptions and schedules into 120 monthly statements.
///
/// Each month is a pure function of the previous month's closing balances and
/// the resolved inputs, evaluated as a left fold from the opening balance sheet.
pub fn consolidate_monthly(
    input: &ConsolidationInput,
    config: &EngineConfig,
) -> ProjectionResult<ComputationOutput<Vec<MonthlyStatement>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let resolved = inputs::resolve(input, config, &mut warnings)?;

    let statements: Vec<MonthlyStatement> = (1..=HORIZON_MONTHS)
        .scan(CarryState::opening(resolved.balance_sheet), |state, month_cum| {
            let row = project_month(state, MonthIndex::new(month_cum), &resolved);
            *state = CarryState::closing(&row);
            Some(row)
        })
        .collect();

    if statements.len() != HORIZON_MONTHS as usize {
        return Err(ProjectionError::Computation(format!(
            "Consolidation produced {} of {HORIZON_MONTHS} months",
            statements.len()
        )));
    }

    if let Some(first_negative) = statements.iter().find(|s| s.closing_cash < Decimal::ZERO) {
        warnings.push(format!(
            "Cash turns negative in month {} (year {}, {})",
            first_negative.month_cum, first_negative.year, first_negative.month_name
        ));
    }

    tracing::debug!(months = statements.len(), "monthly consolidation complete");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly Three-Statement Consolidation (120-month fold)",
        &serde_json::json!({
            "tax_rate": config.tax_rate.to_string(),
            "growth_bounds_pct": [
                config.growth_floor_pct.to_string(),
                config.growth_ceiling_pct.to_string()
            ],
            "seasonality_bounds": [
                config.seasonality_floor.to_string(),
                config.seasonality_ceiling.to_string()
            ],
            "working_capital": &input.working_capital,
        }),
        warnings,
        elapsed,
        statements,
    ))
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

fn project_month(prior: &CarryState, idx: MonthIndex, ctx: &ResolvedInputs<'_>) -> MonthlyStatement {
    let year_slot = idx.year as usize - 1;
    let weight = ctx.seasonality[idx.month as usize - 1];
    let months = Decimal::from(MONTHS_PER_YEAR);

    // Seasonalised flows
    let revenue = ctx.annual_revenue[year_slot] * weight / months;
    let cogs = ctx.annual_cogs[year_slot] * weight / months;
    let operating_expenses = ctx.annual_opex[year_slot] * weight / months;

    let dep_row = &ctx.depreciation[idx.month_cum as usize - 1];
    let senior = DebtMonth::lookup(&ctx.debt.senior, idx.month_cum);
    let short_term = DebtMonth::lookup(&ctx.debt.short_term, idx.month_cum);

    // P&L waterfall. Amortisation is charged through the interest line.
    let gross_profit = revenue + cogs;
    let ebitda = gross_profit + operating_expenses;
    let depreciation = -dep_row.depreciation;
    let ebit = ebitda + depreciation;
    let interest_expense =
        -(senior.interest + senior.amortisation + short_term.interest + short_term.amortisation);
    let net_income_before_tax = ebit + interest_expense;
    let tax_expense = -net_income_before_tax * ctx.tax_rate;
    let net_income = net_income_before_tax + tax_expense;

    // Working capital roll-forward
    let wc = ctx.working_capital;
    let cost_base = (cogs + operating_expenses).abs();
    let accounts_receivable =
        prior.accounts_receivable + monthly_charge(revenue, wc.accounts_receivable_percent);
    let inventory = prior.inventory + monthly_charge(cost_base, wc.inventory_percent);
    let other_current_assets =
        prior.other_current_assets + monthly_charge(revenue, wc.other_current_assets_percent);
    let accounts_payable =
        prior.accounts_payable + monthly_charge(cost_base, wc.accounts_payable_percent);

    let change_in_receivables = prior.accounts_receivable - accounts_receivable;
    let change_in_inventory = prior.inventory - inventory;
    let change_in_other_current_assets = prior.other_current_assets - other_current_assets;
    let change_in_payables = prior.accounts_payable - accounts_payable;

    // Cash flow
    let operating_cash_flow = net_income
        + depreciation.abs()
        + change_in_receivables
        + change_in_inventory
        + change_in_other_current_assets
        - change_in_payables;
    let capex = dep_row.capex_addition;
    let investing_cash_flow = -capex;
    let debt_drawdowns = senior.additional_loan + short_term.additional_loan;
    let debt_repayments = senior.repayment + short_term.repayment;
    let financing_cash_flow = debt_drawdowns - debt_repayments;
    let net_cash_flow = operating_cash_flow + investing_cash_flow + financing_cash_flow;
    let opening_cash = prior.cash;
    let closing_cash = opening_cash + net_cash_flow;

    // Balance sheet
    let bs = ctx.balance_sheet;
    let ppe = dep_row.closing_balance;
    let total_assets =
        closing_cash + accounts_receivable + inventory + other_current_assets + ppe + bs.other_assets;
    let senior_debt = senior.closing_balance;
    let short_term_debt = short_term.closing_balance;
    let total_debt = senior_debt + short_term_debt;
    let retained_earnings = prior.retained_earnings + net_income;
    let total_liabilities_and_equity = accounts_payable + total_debt + bs.equity + retained_earnings;

    MonthlyStatement {
        month_cum: idx.month_cum,
        year: idx.year,
        month: idx.month,
        month_name: idx.month_name().to_string(),
        revenue,
        cogs,
        gross_profit,
        operating_expenses,
        ebitda,
        depreciation,
        ebit,
        interest_expense,
        net_income_before_tax,
        tax_expense,
        net_income,
        opening_cash,
        change_in_receivables,
        change_in_inventory,
        change_in_other_current_assets,
        change_in_payables,
        operating_cash_flow,
        capex,
        investing_cash_flow,
        debt_drawdowns,
        debt_repayments,
        financing_cash_flow,
        net_cash_flow,
        closing_cash,
        accounts_receivable,
        inventory,
        other_current_assets,
        ppe,
        other_assets: bs.other_assets,
        total_assets,
        accounts_payable,
        senior_debt,
        short_term_debt,
        total_debt,
        equity: bs.equity,
        retained_earnings,
        total_liabilities_and_equity,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
