use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ProjectionError;
use crate::types::*;
use crate::ProjectionResult;

/// Longest maturity accepted for one instrument.
pub const MAX_MATURITY_YEARS: u32 = 50;

/// Which slot of the capital structure a debt instrument occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    Senior,
    ShortTerm,
}

impl DebtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtType::Senior => "senior",
            DebtType::ShortTerm => "short_term",
        }
    }
}

/// Input for a single debt instrument. Rate components are percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtInput {
    pub principal: Money,
    #[serde(default)]
    pub additional_loan: Money,
    pub bank_base_rate: Rate,
    pub liquidity_premium: Rate,
    pub credit_risk_premium: Rate,
    pub maturity_years: u32,
    pub amortization_years: u32,
    pub debt_type: DebtType,
}

impl DebtInput {
    /// All-in annual rate as a percentage.
    pub fn annual_rate_pct(&self) -> Rate {
        self.bank_base_rate + self.liquidity_premium + self.credit_risk_premium
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_pct() / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
    }
}

/// A single month in the debt schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtScheduleRow {
    pub month_cum: u32,
    pub year: u32,
    pub month: u32,
    pub opening_balance: Money,
    pub additional_loan: Money,
    pub amortisation: Money,
    pub interest: Money,
    pub repayment: Money,
    pub closing_balance: Money,
}

/// Debt schedule for one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtScheduleOutput {
    pub debt_type: DebtType,
    pub rows: Vec<DebtScheduleRow>,
    pub total_interest: Money,
    pub total_repayment: Money,
}

/// Build a month-by-month straight-line amortisation schedule.
pub fn build_debt_schedule(
    input: &DebtInput,
) -> ProjectionResult<ComputationOutput<DebtScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let total_months = input.maturity_years * MONTHS_PER_YEAR;
    let amortization_years = if input.amortization_years > input.maturity_years {
        warnings.push(format!(
            "Amortization period of {} years exceeds maturity; capped at {} years",
            input.amortization_years, input.maturity_years
        ));
        input.maturity_years
    } else {
        input.amortization_years
    };
    let amortization_months = amortization_years * MONTHS_PER_YEAR;
    if amortization_months == 0 {
        warnings.push("No amortization window: schedule is interest-only".into());
    }

    let scheduled = if amortization_months == 0 {
        Decimal::ZERO
    } else {
        input.principal / Decimal::from(amortization_months)
    };
    let annual_rate_pct = input.annual_rate_pct();

    let mut rows = Vec::with_capacity(total_months as usize);
    let mut balance = input.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_repayment = Decimal::ZERO;

    for month_cum in 1..=total_months {
        let idx = MonthIndex::new(month_cum);
        let opening = balance;
        let additional = if month_cum == 1 {
            input.additional_loan
        } else {
            Decimal::ZERO
        };

        let interest = monthly_charge(opening, annual_rate_pct);

        let amortisation = if month_cum <= amortization_months {
            scheduled.min(opening + additional).max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        balance = opening + additional - amortisation;
        total_interest += interest;
        total_repayment += amortisation;

        rows.push(DebtScheduleRow {
            month_cum,
            year: idx.year,
            month: idx.month,
            opening_balance: opening,
            additional_loan: additional,
            amortisation,
            interest,
            repayment: amortisation,
            closing_balance: balance,
        });
    }

    if rows.is_empty() {
        return Err(ProjectionError::Computation(
            "Debt schedule produced no rows".into(),
        ));
    }

    let output = DebtScheduleOutput {
        debt_type: input.debt_type,
        rows,
        total_interest,
        total_repayment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly Straight-Line Debt Amortisation",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &DebtInput) -> ProjectionResult<()> {
    if input.principal <= Decimal::ZERO && input.additional_loan <= Decimal::ZERO {
        return Err(ProjectionError::invalid(
            "principal",
            "Principal or additional loan must be positive",
        ));
    }
    if input.principal < Decimal::ZERO {
        return Err(ProjectionError::invalid(
            "principal",
            format!("Principal must be non-negative, got {}", input.principal),
        ));
    }
    if input.additional_loan < Decimal::ZERO {
        return Err(ProjectionError::invalid(
            "additional_loan",
            format!(
                "Additional loan must be non-negative, got {}",
                input.additional_loan
            ),
        ));
    }
    if input.maturity_years == 0 || input.maturity_years > MAX_MATURITY_YEARS {
        return Err(ProjectionError::invalid(
            "maturity_years",
            format!(
                "Maturity must be between 1 and {MAX_MATURITY_YEARS} years, got {}",
                input.maturity_years
            ),
        ));
    }
    for (field, value) in [
        ("bank_base_rate", input.bank_base_rate),
        ("liquidity_premium", input.liquidity_premium),
        ("credit_risk_premium", input.credit_risk_premium),
    ] {
        if value < Decimal::ZERO {
            return Err(ProjectionError::invalid(
                field,
                format!("Rate must be non-negative, got {value}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn senior_input() -> DebtInput {
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

    #[test]
    fn test_first_month_known_answer() {
        let result = build_debt_schedule(&senior_input()).unwrap();
        let row = &result.result.rows[0];

        // 50000 * 0.07 / 12 = 291.67
        assert_eq!(row.interest.round_dp(2), dec!(291.67));
        // 50000 / 48 = 1041.67
        assert_eq!(row.amortisation.round_dp(2), dec!(1041.67));
        assert_eq!(row.closing_balance.round_dp(2), dec!(48958.33));
        assert_eq!(row.repayment, row.amortisation);
    }

    #[test]
    fn test_schedule_length_matches_maturity() {
        let result = build_debt_schedule(&senior_input()).unwrap();
        assert_eq!(result.result.rows.len(), 120);

        let mut input = senior_input();
        input.maturity_years = 3;
        input.amortization_years = 3;
        let result = build_debt_schedule(&input).unwrap();
        assert_eq!(result.result.rows.len(), 36);
    }

    #[test]
    fn test_zero_amortisation_after_window() {
        let result = build_debt_schedule(&senior_input()).unwrap();
        let rows = &result.result.rows;
        assert!(rows[47].amortisation > Decimal::ZERO);
        for row in &rows[48..] {
            assert_eq!(row.amortisation, Decimal::ZERO);
            assert!(row.closing_balance.abs() < dec!(0.000001));
        }
    }

    #[test]
    fn test_additional_loan_drawn_in_month_one_only() {
        let mut input = senior_input();
        input.additional_loan = dec!(12000);
        let result = build_debt_schedule(&input).unwrap();
        let rows = &result.result.rows;

        assert_eq!(rows[0].additional_loan, dec!(12000));
        assert!(rows[1..].iter().all(|r| r.additional_loan.is_zero()));
        // Only the principal amortises; the draw stays outstanding
        assert!((rows[119].closing_balance - dec!(12000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_amortization_capped_at_maturity() {
        let mut input = senior_input();
        input.maturity_years = 2;
        input.amortization_years = 5;
        let result = build_debt_schedule(&input).unwrap();

        assert_eq!(result.result.rows.len(), 24);
        // 50000 / 24
        assert_eq!(
            result.result.rows[0].amortisation.round_dp(2),
            dec!(2083.33)
        );
        assert!(result.warnings.iter().any(|w| w.contains("capped")));
    }

    #[test]
    fn test_interest_only_schedule() {
        let mut input = senior_input();
        input.amortization_years = 0;
        let result = build_debt_schedule(&input).unwrap();
        let rows = &result.result.rows;
        assert!(rows.iter().all(|r| r.closing_balance == dec!(50000)));
        assert_eq!(result.result.total_repayment, Decimal::ZERO);
    }

    #[test]
    fn test_additional_loan_only() {
        let mut input = senior_input();
        input.principal = Decimal::ZERO;
        input.additional_loan = dec!(5000);
        let result = build_debt_schedule(&input).unwrap();
        let first = &result.result.rows[0];
        assert_eq!(first.opening_balance, Decimal::ZERO);
        assert_eq!(first.interest, Decimal::ZERO);
        assert_eq!(first.closing_balance, dec!(5000));
    }

    #[test]
    fn test_no_principal_and_no_additional_loan_rejected() {
        let mut input = senior_input();
        input.principal = Decimal::ZERO;
        assert!(matches!(
            build_debt_schedule(&input),
            Err(ProjectionError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_zero_maturity_rejected() {
        let mut input = senior_input();
        input.maturity_years = 0;
        assert!(build_debt_schedule(&input).is_err());
    }

    #[test]
    fn test_maturity_beyond_limit_rejected() {
        let mut input = senior_input();
        input.maturity_years = 400_000_000;
        assert!(matches!(
            build_debt_schedule(&input),
            Err(ProjectionError::InvalidInput { ref field, .. }) if field == "maturity_years"
        ));

        input.maturity_years = MAX_MATURITY_YEARS;
        input.amortization_years = u32::MAX;
        let result = build_debt_schedule(&input).unwrap();
        assert_eq!(result.result.rows.len(), (MAX_MATURITY_YEARS * 12) as usize);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut input = senior_input();
        input.credit_risk_premium = dec!(-1);
        assert!(build_debt_schedule(&input).is_err());
    }

    #[test]
    fn test_debt_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&DebtType::ShortTerm).unwrap(),
            "\"short_term\""
        );
        assert_eq!(DebtType::Senior.as_str(), "senior");
    }
}
