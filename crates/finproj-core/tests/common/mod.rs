#![allow(dead_code)]

use finproj_core::consolidation::inputs::{
    BalanceSheetBaseline, BaselineFinancials, GrowthAssumptions, ProfitLossBaseline,
    SeasonalityProfile, WorkingCapitalRatios,
};
use finproj_core::pipeline::ProjectionInputs;
use finproj_core::schedules::debt::{DebtInput, DebtType};
use finproj_core::schedules::depreciation::{DepreciationInput, DepreciationMethod};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub fn senior_debt() -> DebtInput {
    DebtInput {
        principal: dec!(50000),
        additional_loan: Decimal::ZERO,
        bank_base_rate: dec!(5),
        liquidity_premium: dec!(1),
        credit_risk_premium: dec!(1),
        maturity_years: 10,
        amortization_years: 4,
        debt_type: DebtType::Senior,
    }
}

pub fn short_term_debt() -> DebtInput {
    DebtInput {
        principal: dec!(12000),
        additional_loan: dec!(3000),
        bank_base_rate: dec!(5),
        liquidity_premium: dec!(2),
        credit_risk_premium: dec!(1.5),
        maturity_years: 3,
        amortization_years: 2,
        debt_type: DebtType::ShortTerm,
    }
}

pub fn asset_pool() -> DepreciationInput {
    DepreciationInput {
        opening_balance: dec!(15000),
        monthly_capex: dec!(1667),
        depreciation_rate: dec!(10),
        depreciation_method: DepreciationMethod::StraightLine,
        salvage_value: None,
    }
}

pub fn seasonal_profile() -> SeasonalityProfile {
    let mut profile = SeasonalityProfile::default();
    for (name, weight) in [
        ("January", dec!(0.8)),
        ("February", dec!(0.85)),
        ("March", dec!(1.0)),
        ("April", dec!(1.0)),
        ("May", dec!(1.05)),
        ("June", dec!(1.1)),
        ("July", dec!(0.9)),
        ("August", dec!(0.8)),
        ("September", dec!(1.05)),
        ("October", dec!(1.1)),
        ("November", dec!(1.15)),
        ("December", dec!(1.2)),
    ] {
        profile.weights.insert(name.to_string(), weight);
    }
    profile
}

pub fn projection_inputs() -> ProjectionInputs {
    ProjectionInputs {
        baseline: BaselineFinancials {
            profit_loss: Some(ProfitLossBaseline {
                revenue: dec!(360000),
                cogs: dec!(-144000),
                operating_expenses: dec!(-96000),
            }),
            balance_sheet: Some(BalanceSheetBaseline {
                cash: dec!(40000),
                accounts_receivable: dec!(12000),
                inventory: dec!(9000),
                other_current_assets: dec!(2500),
                other_assets: dec!(5000),
                accounts_payable: dec!(11000),
                ppe: dec!(15000),
                equity: dec!(60000),
                retained_earnings: dec!(12500),
            }),
        },
        growth: GrowthAssumptions {
            revenue: vec![
                dec!(12),
                dec!(10),
                dec!(9),
                dec!(8),
                dec!(7),
                dec!(6),
                dec!(5),
                dec!(5),
                dec!(4),
                dec!(4),
            ],
            cogs: vec![dec!(8); 10],
            operating_expenses: vec![dec!(5); 10],
        },
        seasonality: seasonal_profile(),
        working_capital: WorkingCapitalRatios {
            accounts_receivable_percent: dec!(17.6),
            inventory_percent: dec!(9),
            other_current_assets_percent: dec!(1.5),
            accounts_payable_percent: dec!(11),
        },
        senior_debt: Some(senior_debt()),
        short_term_debt: Some(short_term_debt()),
        depreciation: asset_pool(),
    }
}

/// Tolerance for sums of 28-digit decimals.
pub const EPSILON: Decimal = dec!(0.000001);

pub fn close(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < EPSILON
}
