use chrono::Month;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates as supplied by the dashboard: percentages (5 = 5%) unless a field
/// says otherwise.
pub type Rate = Decimal;

/// Fixed projection horizon: ten years of months.
pub const HORIZON_MONTHS: u32 = 120;

pub const MONTHS_PER_YEAR: u32 = 12;

pub const MONTHS_PER_QUARTER: u32 = 3;

/// Position of a month within the projection horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthIndex {
    /// 1-based cumulative month
    pub month_cum: u32,
    /// 1-based projection year
    pub year: u32,
    /// Calendar month, 1..=12
    pub month: u32,
}

impl MonthIndex {
    pub fn new(month_cum: u32) -> Self {
        Self {
            month_cum,
            year: month_cum.div_ceil(MONTHS_PER_YEAR),
            month: (month_cum - 1) % MONTHS_PER_YEAR + 1,
        }
    }

    pub fn quarter(&self) -> u32 {
        (self.month - 1) / MONTHS_PER_QUARTER + 1
    }

    pub fn calendar_month(&self) -> Month {
        // month is always in 1..=12 by construction
        Month::try_from(self.month as u8).unwrap_or(Month::January)
    }

    pub fn month_name(&self) -> &'static str {
        self.calendar_month().name()
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// One month's charge of an annual percentage rate on a balance.
///
/// Multiplies before dividing so whole-number inputs stay exact.
pub fn monthly_charge(balance: Money, annual_rate_pct: Rate) -> Money {
    balance * annual_rate_pct / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR)
}

/// Divide, returning zero instead of failing on a zero denominator.
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
