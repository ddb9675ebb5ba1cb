use chrono::Month;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::error::ProjectionError;
use crate::schedules::debt::DebtScheduleRow;
use crate::schedules::depreciation::DepreciationScheduleRow;
use crate::types::{Money, Rate, HORIZON_MONTHS, MONTHS_PER_YEAR};
use crate::ProjectionResult;

pub const SECTION_PROFIT_LOSS: &str = "Profit & Loss";
pub const SECTION_BALANCE_SHEET: &str = "Balance Sheet";
pub const SECTION_DEBT_STRUCTURE: &str = "Debt Structure";

// ---------------------------------------------------------------------------
// Baseline
// ---------------------------------------------------------------------------

/// Base-year profit & loss. Costs are stored negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitLossBaseline {
    pub revenue: Money,
    pub cogs: Money,
    pub operating_expenses: Money,
}

/// Opening balance sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetBaseline {
    pub cash: Money,
    pub accounts_receivable: Money,
    pub inventory: Money,
    pub other_current_assets: Money,
    #[serde(default)]
    pub other_assets: Money,
    pub accounts_payable: Money,
    pub ppe: Money,
    pub equity: Money,
    pub retained_earnings: Money,
}

/// Starting snapshot. Either section may be absent when the user has not
/// filled it in yet; consolidation refuses to run until both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineFinancials {
    #[serde(default)]
    pub profit_loss: Option<ProfitLossBaseline>,
    #[serde(default)]
    pub balance_sheet: Option<BalanceSheetBaseline>,
}

// ---------------------------------------------------------------------------
// Assumptions
// ---------------------------------------------------------------------------

/// Annual growth rates in percent, one entry per projection year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrowthAssumptions {
    #[serde(default)]
    pub revenue: Vec<Rate>,
    #[serde(default)]
    pub cogs: Vec<Rate>,
    #[serde(default)]
    pub operating_expenses: Vec<Rate>,
}

impl GrowthAssumptions {
    /// The same rates for every projection year.
    pub fn flat(revenue: Rate, cogs: Rate, operating_expenses: Rate) -> Self {
        let years = (HORIZON_MONTHS / MONTHS_PER_YEAR) as usize;
        Self {
            revenue: vec![revenue; years],
            cogs: vec![cogs; years],
            operating_expenses: vec![operating_expenses; years],
        }
    }
}

/// Relative weight of each calendar month, keyed by month name ("January",
/// "jan", ...). Missing months weigh 1.0.
///
/// Weights are an index, not shares of the year: a month's flow is
/// `annual × weight / 12`, so 1.0 is an average month and twelve weights of
/// 1.0 reproduce the annual figure. Shares such as 0.0833 must be multiplied
/// by 12 first; otherwise they fall below the seasonality floor and are
/// clamped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonalityProfile {
    pub weights: BTreeMap<String, Decimal>,
}

impl SeasonalityProfile {
    /// Resolve names to calendar order, rejecting unknown keys.
    pub fn monthly_weights(&self) -> ProjectionResult<[Option<Decimal>; 12]> {
        let mut out = [None; 12];
        for (name, weight) in &self.weights {
            let month: Month = name.trim().parse().map_err(|_| {
                ProjectionError::invalid("seasonality", format!("Unknown month name '{name}'"))
            })?;
            out[month.number_from_month() as usize - 1] = Some(*weight);
        }
        Ok(out)
    }
}

/// Working-capital drivers, in percent of the monthly flow that feeds them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkingCapitalRatios {
    pub accounts_receivable_percent: Rate,
    pub inventory_percent: Rate,
    pub other_current_assets_percent: Rate,
    pub accounts_payable_percent: Rate,
}

impl WorkingCapitalRatios {
    fn all(&self) -> [Rate; 4] {
        [
            self.accounts_receivable_percent,
            self.inventory_percent,
            self.other_current_assets_percent,
            self.accounts_payable_percent,
        ]
    }

    /// True when every ratio is at most 1 and at least one is non-zero, which
    /// suggests fractions were supplied where percentages are expected.
    pub fn looks_fractional(&self) -> bool {
        let ratios = self.all();
        ratios.iter().all(|r| r.abs() <= Decimal::ONE) && ratios.iter().any(|r| !r.is_zero())
    }
}

/// Both debt instruments' monthly rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtSchedules {
    #[serde(default)]
    pub senior: Vec<DebtScheduleRow>,
    #[serde(default)]
    pub short_term: Vec<DebtScheduleRow>,
}

impl DebtSchedules {
    /// True when neither instrument has any rows.
    pub fn is_empty(&self) -> bool {
        self.senior.is_empty() && self.short_term.is_empty()
    }
}

/// Everything the monthly consolidation reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationInput {
    pub baseline: BaselineFinancials,
    #[serde(default)]
    pub growth: GrowthAssumptions,
    #[serde(default)]
    pub seasonality: SeasonalityProfile,
    #[serde(default)]
    pub working_capital: WorkingCapitalRatios,
    #[serde(default)]
    pub debt: Option<DebtSchedules>,
    pub depreciation: Vec<DepreciationScheduleRow>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Inputs after presence checks, clamping and padding.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedInputs<'a> {
    pub profit_loss: &'a ProfitLossBaseline,
    pub balance_sheet: &'a BalanceSheetBaseline,
    pub debt: &'a DebtSchedules,
    pub depreciation: &'a [DepreciationScheduleRow],
    pub working_capital: &'a WorkingCapitalRatios,
    /// Projected annual revenue, COGS and opex, one entry per year
    pub annual_revenue: Vec<Money>,
    pub annual_cogs: Vec<Money>,
    pub annual_opex: Vec<Money>,
    pub seasonality: [Decimal; 12],
    pub tax_rate: Rate,
}

pub(crate) fn resolve<'a>(
    input: &'a ConsolidationInput,
    config: &EngineConfig,
    warnings: &mut Vec<String>,
) -> ProjectionResult<ResolvedInputs<'a>> {
    let mut missing = Vec::new();
    if input.baseline.profit_loss.is_none() {
        missing.push(SECTION_PROFIT_LOSS.to_string());
    }
    if input.baseline.balance_sheet.is_none() {
        missing.push(SECTION_BALANCE_SHEET.to_string());
    }
    let debt = input.debt.as_ref().filter(|d| !d.is_empty());
    if debt.is_none() {
        missing.push(SECTION_DEBT_STRUCTURE.to_string());
    }
    let (Some(profit_loss), Some(balance_sheet), Some(debt)) = (
        input.baseline.profit_loss.as_ref(),
        input.baseline.balance_sheet.as_ref(),
        debt,
    ) else {
        return Err(ProjectionError::MissingData { sections: missing });
    };

    config.validate()?;

    if input.depreciation.len() < HORIZON_MONTHS as usize {
        return Err(ProjectionError::invalid(
            "depreciation",
            format!(
                "Depreciation schedule must cover {HORIZON_MONTHS} months, got {}",
                input.depreciation.len()
            ),
        ));
    }
    check_contiguous("depreciation", input.depreciation.iter().map(|r| r.month_cum))?;

    let schedule_opening = input.depreciation[0].opening_balance;
    if balance_sheet.ppe != schedule_opening {
        warnings.push(format!(
            "Baseline PP&E {} differs from the depreciation schedule's opening balance {}; \
             PP&E follows the schedule",
            balance_sheet.ppe, schedule_opening
        ));
    }
    check_contiguous("debt.senior", debt.senior.iter().map(|r| r.month_cum))?;
    check_contiguous("debt.short_term", debt.short_term.iter().map(|r| r.month_cum))?;

    if input.working_capital.looks_fractional() {
        warnings.push(
            "Working-capital ratios are all at most 1; they are applied as percentages".into(),
        );
    }

    let annual_revenue = project_annual(
        "revenue",
        profit_loss.revenue,
        &input.growth.revenue,
        config,
        warnings,
    )?;
    let annual_cogs = project_annual("cogs", profit_loss.cogs, &input.growth.cogs, config, warnings)?;
    let annual_opex = project_annual(
        "operating_expenses",
        profit_loss.operating_expenses,
        &input.growth.operating_expenses,
        config,
        warnings,
    )?;

    let mut seasonality = [Decimal::ONE; 12];
    for (slot, weight) in input.seasonality.monthly_weights()?.into_iter().enumerate() {
        if let Some(w) = weight {
            let clamped = config.clamp_seasonality(w);
            if clamped != w {
                warnings.push(format!(
                    "Seasonality weight {w} for month {} clamped to {clamped}",
                    slot + 1
                ));
            }
            seasonality[slot] = clamped;
        }
    }

    Ok(ResolvedInputs {
        profit_loss,
        balance_sheet,
        debt,
        depreciation: &input.depreciation[..HORIZON_MONTHS as usize],
        working_capital: &input.working_capital,
        annual_revenue,
        annual_cogs,
        annual_opex,
        seasonality,
        tax_rate: config.tax_rate,
    })
}

/// Compound a base-year figure through each year's clamped growth rate.
fn project_annual(
    line: &str,
    base: Money,
    rates: &[Rate],
    config: &EngineConfig,
    warnings: &mut Vec<String>,
) -> ProjectionResult<Vec<Money>> {
    let years = (HORIZON_MONTHS / MONTHS_PER_YEAR) as usize;
    if rates.len() > years {
        return Err(ProjectionError::invalid(
            &format!("growth.{line}"),
            format!("At most {years} annual growth rates allowed, got {}", rates.len()),
        ));
    }
    if rates.len() < years {
        warnings.push(format!(
            "Growth rates for {line} cover {} of {years} years; remaining years use 0%",
            rates.len()
        ));
    }

    let mut value = base;
    let mut projected = Vec::with_capacity(years);
    for year in 0..years {
        let raw = rates.get(year).copied().unwrap_or(Decimal::ZERO);
        let rate = config.clamp_growth(raw);
        if rate != raw {
            warnings.push(format!(
                "Year {}: {line} growth {raw}% clamped to {rate}%",
                year + 1
            ));
        }
        value *= Decimal::ONE + rate / Decimal::ONE_HUNDRED;
        projected.push(value);
    }
    Ok(projected)
}

fn check_contiguous(field: &str, months: impl Iterator<Item = u32>) -> ProjectionResult<()> {
    for (i, month_cum) in months.enumerate() {
        if month_cum as usize != i + 1 {
            return Err(ProjectionError::invalid(
                field,
                format!("Rows must be contiguous from month 1; row {} has month {month_cum}", i + 1),
            ));
        }
    }
    Ok(())
}
