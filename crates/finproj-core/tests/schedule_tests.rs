mod common;

use finproj_core::schedules::debt::{build_debt_schedule, DebtInput, DebtType};
use finproj_core::schedules::depreciation::{
    build_depreciation_schedule, DepreciationInput, DepreciationMethod,
};
use finproj_core::ProjectionError;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::close;

// ===========================================================================
// Debt schedule
// ===========================================================================

#[test]
fn test_debt_known_answer_month_one() {
    let out = build_debt_schedule(&common::senior_debt()).unwrap().result;
    let m1 = &out.rows[0];
    assert_eq!(m1.month_cum, 1);
    assert_eq!(m1.opening_balance, dec!(50000));
    assert_eq!(m1.interest.round_dp(2), dec!(291.67));
    assert_eq!(m1.amortisation.round_dp(2), dec!(1041.67));
    assert_eq!(m1.closing_balance.round_dp(2), dec!(48958.33));
}

#[test]
fn test_debt_conservation_with_additional_loan() {
    let input = common::short_term_debt();
    let out = build_debt_schedule(&input).unwrap().result;
    let amortised: Decimal = out.rows.iter().map(|r| r.amortisation).sum();
    let drawn: Decimal = out.rows.iter().map(|r| r.additional_loan).sum();
    let last = out.rows.last().unwrap();

    assert_eq!(out.rows.len(), 36);
    assert!(close(amortised + last.closing_balance, input.principal + drawn));
    assert_eq!(out.total_repayment, amortised);
}

#[test]
fn test_debt_rejects_empty_instrument() {
    let input = DebtInput {
        principal: Decimal::ZERO,
        additional_loan: Decimal::ZERO,
        ..common::senior_debt()
    };
    assert!(matches!(
        build_debt_schedule(&input),
        Err(ProjectionError::InvalidInput { .. })
    ));
}

#[test]
fn test_debt_input_from_json() {
    let json = r#"{
        "principal": "50000",
        "bank_base_rate": "5",
        "liquidity_premium": "1",
        "credit_risk_premium": "1",
        "maturity_years": 10,
        "amortization_years": 4,
        "debt_type": "senior"
    }"#;
    let input: DebtInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.additional_loan, Decimal::ZERO);
    assert_eq!(input.debt_type, DebtType::Senior);
    assert_eq!(input.annual_rate_pct(), dec!(7));
}

// ===========================================================================
// Depreciation schedule
// ===========================================================================

#[test]
fn test_depreciation_known_answer_month_one() {
    let out = build_depreciation_schedule(&common::asset_pool()).unwrap().result;
    assert_eq!(out.rows[0].depreciation, dec!(125.00));
    assert_eq!(out.rows[0].closing_balance, dec!(16542.00));
}

#[test]
fn test_depreciation_roll_forward() {
    let out = build_depreciation_schedule(&common::asset_pool()).unwrap().result;
    for pair in out.rows.windows(2) {
        assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        assert_eq!(pair[1].month_cum, pair[0].month_cum + 1);
    }
}

// ===========================================================================
// Properties
// ===========================================================================

fn money(lo: i64, hi: i64) -> impl Strategy<Value = Decimal> {
    (lo..hi).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #[test]
    fn prop_debt_conserves_principal(
        principal in money(0, 100_000_000),
        additional in money(0, 10_000_000),
        base in money(0, 1_000),
        maturity in 1u32..15,
        amortization in 0u32..20,
    ) {
        prop_assume!(principal > Decimal::ZERO || additional > Decimal::ZERO);
        let input = DebtInput {
            principal,
            additional_loan: additional,
            bank_base_rate: base,
            liquidity_premium: dec!(1),
            credit_risk_premium: dec!(0.5),
            maturity_years: maturity,
            amortization_years: amortization,
            debt_type: DebtType::Senior,
        };
        let out = build_debt_schedule(&input).unwrap().result;

        prop_assert_eq!(out.rows.len() as u32, maturity * 12);
        let amortised: Decimal = out.rows.iter().map(|r| r.amortisation).sum();
        let drawn: Decimal = out.rows.iter().map(|r| r.additional_loan).sum();
        let last = out.rows.last().unwrap();
        prop_assert!(close(amortised + last.closing_balance, principal + drawn));

        for (i, row) in out.rows.iter().enumerate() {
            prop_assert_eq!(row.month_cum as usize, i + 1);
            prop_assert!(row.closing_balance >= Decimal::ZERO);
        }
        for pair in out.rows.windows(2) {
            prop_assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
    }

    #[test]
    fn prop_depreciation_never_negative(
        opening in money(1, 10_000_000),
        capex in money(0, 100_000),
        rate in money(1, 10_000),
        declining in any::<bool>(),
    ) {
        let input = DepreciationInput {
            opening_balance: opening,
            monthly_capex: capex,
            depreciation_rate: rate,
            depreciation_method: if declining {
                DepreciationMethod::DecliningBalance
            } else {
                DepreciationMethod::StraightLine
            },
            salvage_value: None,
        };
        let out = build_depreciation_schedule(&input).unwrap().result;
        prop_assert_eq!(out.rows.len(), 120);
        for row in &out.rows {
            prop_assert!(row.closing_balance >= Decimal::ZERO);
            prop_assert!(row.depreciation >= Decimal::ZERO);
        }
        for pair in out.rows.windows(2) {
            prop_assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
    }
}
