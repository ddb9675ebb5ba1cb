use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use finproj_core::schedules::debt::{self, DebtInput, DebtType};
use finproj_core::schedules::depreciation::{self, DepreciationInput, DepreciationMethod};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DebtKind {
    Senior,
    ShortTerm,
}

impl From<DebtKind> for DebtType {
    fn from(kind: DebtKind) -> Self {
        match kind {
            DebtKind::Senior => DebtType::Senior,
            DebtKind::ShortTerm => DebtType::ShortTerm,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodKind {
    StraightLine,
    DecliningBalance,
}

impl From<MethodKind> for DepreciationMethod {
    fn from(kind: MethodKind) -> Self {
        match kind {
            MethodKind::StraightLine => DepreciationMethod::StraightLine,
            MethodKind::DecliningBalance => DepreciationMethod::DecliningBalance,
        }
    }
}

/// Arguments for a debt amortization schedule
#[derive(Args)]
pub struct DebtScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal drawn at the start of month 1
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Additional loan drawn in month 1
    #[arg(long, default_value = "0")]
    pub additional_loan: Decimal,

    /// Bank base rate, percent p.a.
    #[arg(long)]
    pub base_rate: Option<Decimal>,

    /// Liquidity premium, percent p.a.
    #[arg(long, default_value = "0")]
    pub liquidity_premium: Decimal,

    /// Credit risk premium, percent p.a.
    #[arg(long, default_value = "0")]
    pub credit_risk_premium: Decimal,

    /// Years to maturity
    #[arg(long)]
    pub maturity_years: Option<u32>,

    /// Years over which principal is amortised (0 = interest-only)
    #[arg(long)]
    pub amortization_years: Option<u32>,

    #[arg(long, value_enum, default_value = "senior")]
    pub debt_type: DebtKind,
}

pub fn run_debt_schedule(args: DebtScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let debt_input: DebtInput = if args.input.is_some() || args.principal.is_none() {
        input::read_input(args.input.as_deref(), "debt-schedule")?
    } else {
        DebtInput {
            principal: args.principal.ok_or("--principal is required (or provide --input)")?,
            additional_loan: args.additional_loan,
            bank_base_rate: args
                .base_rate
                .ok_or("--base-rate is required (or provide --input)")?,
            liquidity_premium: args.liquidity_premium,
            credit_risk_premium: args.credit_risk_premium,
            maturity_years: args
                .maturity_years
                .ok_or("--maturity-years is required (or provide --input)")?,
            amortization_years: args
                .amortization_years
                .ok_or("--amortization-years is required (or provide --input)")?,
            debt_type: args.debt_type.into(),
        }
    };

    let result = debt::build_debt_schedule(&debt_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a depreciation schedule
#[derive(Args)]
pub struct DepreciationScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net book value at the start of month 1
    #[arg(long)]
    pub opening_balance: Option<Decimal>,

    /// Capital expenditure added every month
    #[arg(long, default_value = "0")]
    pub monthly_capex: Decimal,

    /// Depreciation rate, percent p.a.
    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long, value_enum, default_value = "straight-line")]
    pub method: MethodKind,

    /// Floor for the declining-balance method
    #[arg(long)]
    pub salvage_value: Option<Decimal>,
}

pub fn run_depreciation_schedule(
    args: DepreciationScheduleArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dep_input: DepreciationInput = if args.input.is_some() || args.opening_balance.is_none() {
        input::read_input(args.input.as_deref(), "depreciation-schedule")?
    } else {
        DepreciationInput {
            opening_balance: args
                .opening_balance
                .ok_or("--opening-balance is required (or provide --input)")?,
            monthly_capex: args.monthly_capex,
            depreciation_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            depreciation_method: args.method.into(),
            salvage_value: args.salvage_value,
        }
    };

    let result = depreciation::build_depreciation_schedule(&dep_input)?;
    Ok(serde_json::to_value(result)?)
}
