use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ProjectionError;
use crate::types::*;
use crate::ProjectionResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    #[default]
    StraightLine,
    DecliningBalance,
}

/// Input for one fixed-asset pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationInput {
    pub opening_balance: Money,
    pub monthly_capex: Money,
    /// Annual depreciation rate, percent
    pub depreciation_rate: Rate,
    #[serde(default)]
    pub depreciation_method: DepreciationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salvage_value: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationScheduleRow {
    pub month_cum: u32,
    pub year: u32,
    pub month: u32,
    pub opening_balance: Money,
    pub capex_addition: Money,
    pub depreciation: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationScheduleOutput {
    pub method: DepreciationMethod,
    pub rows: Vec<DepreciationScheduleRow>,
    pub total_depreciation: Money,
    pub total_capex: Money,
}

/// Build the 120-month depreciation schedule for an asset pool.
///
/// Both methods apply the monthly rate to the month's opening balance (the
/// prior month's closing balance). Straight-line floors the closing balance at
/// zero; declining-balance stops depreciating at the salvage value.
pub fn build_depreciation_schedule(
    input: &DepreciationInput,
) -> ProjectionResult<ComputationOutput<DepreciationScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let salvage = match input.depreciation_method {
        DepreciationMethod::StraightLine => {
            if input.salvage_value.is_some() {
                warnings.push("Salvage value is ignored for straight-line depreciation".into());
            }
            Decimal::ZERO
        }
        DepreciationMethod::DecliningBalance => input.salvage_value.unwrap_or(Decimal::ZERO),
    };

    let mut rows = Vec::with_capacity(HORIZON_MONTHS as usize);
    let mut balance = input.opening_balance;
    let mut total_depreciation = Decimal::ZERO;
    let mut total_capex = Decimal::ZERO;

    for month_cum in 1..=HORIZON_MONTHS {
        let idx = MonthIndex::new(month_cum);
        let opening = balance;
        let charge = monthly_charge(opening, input.depreciation_rate);

        let (depreciation, closing) = match input.depreciation_method {
            DepreciationMethod::StraightLine => {
                let closing = (opening + input.monthly_capex - charge).max(Decimal::ZERO);
                // Flooring reduces the charge to what the pool can absorb
                (opening + input.monthly_capex - closing, closing)
            }
            DepreciationMethod::DecliningBalance => {
                let headroom = (opening - salvage).max(Decimal::ZERO);
                let depreciation = charge.min(headroom);
                (depreciation, opening - depreciation + input.monthly_capex)
            }
        };

        balance = closing;
        total_depreciation += depreciation;
        total_capex += input.monthly_capex;

        rows.push(DepreciationScheduleRow {
            month_cum,
            year: idx.year,
            month: idx.month,
            opening_balance: opening,
            capex_addition: input.monthly_capex,
            depreciation,
            closing_balance: closing,
        });
    }

    let output = DepreciationScheduleOutput {
        method: input.depreciation_method,
        rows,
        total_depreciation,
        total_capex,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly Fixed-Asset Depreciation",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &DepreciationInput) -> ProjectionResult<()> {
    if input.opening_balance <= Decimal::ZERO {
        return Err(ProjectionError::invalid(
            "opening_balance",
            format!("Opening balance must be positive, got {}", input.opening_balance),
        ));
    }
    if input.monthly_capex < Decimal::ZERO {
        return Err(ProjectionError::invalid(
            "monthly_capex",
            format!("Monthly capex must be non-negative, got {}", input.monthly_capex),
        ));
    }
    if input.depreciation_rate <= Decimal::ZERO {
        return Err(ProjectionError::invalid(
            "depreciation_rate",
            format!(
                "Depreciation rate must be positive, got {}",
                input.depreciation_rate
            ),
        ));
    }
    if let Some(salvage) = input.salvage_value {
        if salvage < Decimal::ZERO {
            return Err(ProjectionError::invalid(
                "salvage_value",
                format!("Salvage value must be non-negative, got {salvage}"),
            ));
        }
    }
    Ok(())
}
